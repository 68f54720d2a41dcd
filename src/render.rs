//! Style-injection descriptors for generated `@keyframes` rules.

use std::sync::Arc;

use crate::AnimationName;

/// Precedence hint given to every keyframe style node.
pub const LOW_PRECEDENCE: &str = "low";

/// A renderable `<style>` descriptor.
///
/// This is a platform-agnostic representation of what needs to be mounted.
/// Each consumer (server renderer, DOM binding, component framework) can
/// interpret it for its own output.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StyleNode {
    /// Complete `@keyframes` rule, injected verbatim
    pub css: Arc<str>,
    /// Rendering-priority hint, always [`LOW_PRECEDENCE`]
    pub precedence: &'static str,
    /// Stylesheet handle, equal to the animation name
    pub href: AnimationName,
    /// Content-Security-Policy nonce, forwarded unchanged
    pub nonce: Option<String>,
}

impl StyleNode {
    /// Create a low-precedence style node.
    pub fn new(css: Arc<str>, href: AnimationName, nonce: Option<String>) -> Self {
        Self {
            css,
            precedence: LOW_PRECEDENCE,
            href,
            nonce,
        }
    }

    /// Render the node as an HTML `<style>` element.
    ///
    /// Attribute values are escaped; the CSS body is not.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use css_keyframes::{create_keyframe, Declarations, Keyframes, StageKey};
    ///
    /// let keyframes = Keyframes::new().stage(StageKey::To, Declarations::new().set("color", "red"));
    /// let (_, node) = create_keyframe(&keyframes, Some("abc")).unwrap();
    ///
    /// assert_eq!(
    ///     node.to_html(),
    ///     r#"<style data-precedence="low" data-href="_x1nwcv5g" nonce="abc">@keyframes _x1nwcv5g{to{color:red}}</style>"#
    /// );
    /// ```
    pub fn to_html(&self) -> String {
        let mut html = String::with_capacity(self.css.len() + 64);
        html.push_str(&format!(
            r#"<style data-precedence="{}" data-href="{}""#,
            escape_attribute(self.precedence),
            escape_attribute(self.href.as_str())
        ));
        if let Some(nonce) = &self.nonce {
            html.push_str(&format!(r#" nonce="{}""#, escape_attribute(nonce)));
        }
        html.push('>');
        html.push_str(&self.css);
        html.push_str("</style>");
        html
    }
}

fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Web-specific mounting of style nodes.
#[cfg(feature = "web")]
pub mod web {
    use super::*;
    use wasm_bindgen::JsValue;
    use web_sys::Document;

    fn js_err(context: &str) -> impl Fn(JsValue) -> String + '_ {
        move |err| format!("{}: {:?}", context, err)
    }

    /// Append a node's `<style>` element to the document head.
    ///
    /// Returns `Ok(false)` if a style with the same `data-href` is already
    /// mounted, in which case the document is left untouched.
    ///
    /// ## Example
    ///
    /// ```rust,ignore
    /// use css_keyframes::render::web::mount_style;
    ///
    /// let document = web_sys::window().unwrap().document().unwrap();
    /// let (name, node) = css_keyframes::create_keyframe(&keyframes, None)?;
    /// mount_style(&document, &node)?;
    /// ```
    pub fn mount_style(document: &Document, node: &StyleNode) -> Result<bool, String> {
        let selector = format!(r#"style[data-href="{}"]"#, node.href);
        if document
            .query_selector(&selector)
            .map_err(js_err("Failed to query existing styles"))?
            .is_some()
        {
            tracing::trace!(href = %node.href, "style already mounted");
            return Ok(false);
        }

        let head = document.head().ok_or("No document head available")?;
        let style = document
            .create_element("style")
            .map_err(js_err("Failed to create style element"))?;

        style
            .set_attribute("data-precedence", node.precedence)
            .map_err(js_err("Failed to set precedence"))?;
        style
            .set_attribute("data-href", node.href.as_str())
            .map_err(js_err("Failed to set href"))?;
        if let Some(nonce) = &node.nonce {
            style
                .set_attribute("nonce", nonce)
                .map_err(js_err("Failed to set nonce"))?;
        }
        style.set_text_content(Some(&*node.css));

        head.append_child(&style)
            .map_err(js_err("Failed to append style element"))?;
        tracing::debug!(href = %node.href, "style mounted");
        Ok(true)
    }

    /// [`mount_style`] against the current window's document.
    pub fn mount_style_in_window(node: &StyleNode) -> Result<bool, String> {
        let window = web_sys::window().ok_or("No window available")?;
        let document = window.document().ok_or("No document available")?;
        mount_style(&document, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(nonce: Option<&str>) -> StyleNode {
        StyleNode::new(
            Arc::from("@keyframes _x1{to{content:\"<b>\"}}"),
            AnimationName::from_canonical("{}"),
            nonce.map(str::to_string),
        )
    }

    #[test]
    fn test_new_is_low_precedence() {
        assert_eq!(node(None).precedence, LOW_PRECEDENCE);
    }

    #[test]
    fn test_to_html_without_nonce() {
        assert_eq!(
            node(None).to_html(),
            r#"<style data-precedence="low" data-href="_xmv1khr">@keyframes _x1{to{content:"<b>"}}</style>"#
        );
    }

    #[test]
    fn test_to_html_escapes_attributes_only() {
        let html = node(Some(r#"a"b&c"#)).to_html();
        assert!(html.contains(r#"nonce="a&quot;b&amp;c""#));
        assert!(html.contains(r#"content:"<b>""#));
    }

    #[cfg(feature = "web")]
    #[test]
    fn test_web_mounting_exported_at_root() {
        let _: fn(&web_sys::Document, &StyleNode) -> Result<bool, String> = crate::mount_style;
        let _: fn(&StyleNode) -> Result<bool, String> = crate::mount_style_in_window;
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&node(Some("N"))).unwrap();
        assert_eq!(
            json,
            r#"{"css":"@keyframes _x1{to{content:\"<b>\"}}","precedence":"low","href":"_xmv1khr","nonce":"N"}"#
        );
    }
}
