//! Declaration serialization: ordered declarations to `prop:value;prop:value`.

use crate::Declarations;

/// Turns the declarations of one keyframe stage into a CSS declaration block
/// body (without braces).
///
/// Implementations must be deterministic: the output becomes part of a cached
/// rule keyed by the description's hash.
pub trait DeclarationSerializer {
    fn serialize(&self, declarations: &Declarations) -> String;
}

impl<F> DeclarationSerializer for F
where
    F: Fn(&Declarations) -> String,
{
    fn serialize(&self, declarations: &Declarations) -> String {
        self(declarations)
    }
}

/// Default serializer for camelCase style objects.
///
/// Property names are hyphenated (`fontSize` becomes `font-size`,
/// `msTransform` becomes `-ms-transform`), custom properties (`--accent`) are
/// kept as written, and declarations are joined with `;` without a trailing
/// separator. Values are written as-is; no units are appended.
///
/// ## Example
///
/// ```rust
/// use css_keyframes::{Cssify, Declarations, DeclarationSerializer};
///
/// let decls = Declarations::new()
///     .set("fontSize", "16px")
///     .set("opacity", 0.5);
///
/// assert_eq!(Cssify.serialize(&decls), "font-size:16px;opacity:0.5");
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Cssify;

impl DeclarationSerializer for Cssify {
    fn serialize(&self, declarations: &Declarations) -> String {
        let mut css = String::new();
        for (property, value) in declarations.iter() {
            if !css.is_empty() {
                css.push(';');
            }
            css.push_str(&hyphenate_property(property));
            css.push(':');
            css.push_str(&value.to_string());
        }
        css
    }
}

/// Convert a camelCase property name to its CSS spelling.
///
/// ## Example
///
/// ```rust
/// use css_keyframes::hyphenate_property;
///
/// assert_eq!(hyphenate_property("backgroundColor"), "background-color");
/// assert_eq!(hyphenate_property("WebkitTransform"), "-webkit-transform");
/// assert_eq!(hyphenate_property("msTransform"), "-ms-transform");
/// ```
pub fn hyphenate_property(property: &str) -> String {
    if property.starts_with("--") {
        return property.to_string();
    }

    let mut out = String::with_capacity(property.len() + 4);
    for ch in property.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }

    if out.starts_with("ms-") {
        out.insert(0, '-');
    }
    out
}
