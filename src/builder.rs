//! `@keyframes` construction: naming, serialization and caching.

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::{
    AnimationName, Cssify, DeclarationSerializer, KeyframeCache, KeyframeError, Keyframes,
    StyleNode,
};

/// Derive the animation name of a description.
///
/// ## Example
///
/// ```rust
/// use css_keyframes::{animation_name, Declarations, Keyframes, StageKey};
///
/// let keyframes = Keyframes::new().stage(StageKey::To, Declarations::new().set("color", "red"));
/// assert_eq!(animation_name(&keyframes).unwrap(), "_x1nwcv5g");
/// ```
pub fn animation_name(keyframes: &Keyframes) -> Result<AnimationName, KeyframeError> {
    let canonical = keyframes.to_canonical_json()?;
    Ok(AnimationName::from_canonical(&canonical))
}

/// Serialize a description into a complete `@keyframes` rule.
///
/// Stage blocks are emitted in description order with no separator.
pub fn keyframes_css<S>(name: &AnimationName, keyframes: &Keyframes, serializer: &S) -> String
where
    S: DeclarationSerializer + ?Sized,
{
    let mut body = String::new();
    for (stage, declarations) in keyframes.iter() {
        body.push_str(stage.as_str());
        body.push('{');
        body.push_str(&serializer.serialize(declarations));
        body.push('}');
    }
    format!("@keyframes {}{{{}}}", name, body)
}

/// Creates named `@keyframes` rules, reusing previously serialized rules.
///
/// The builder owns its cache, so independent builders never share state.
/// Use [`create_keyframe`] for the process-wide instance.
///
/// ## Example
///
/// ```rust
/// use css_keyframes::{Declarations, KeyframeBuilder, Keyframes, StageKey};
///
/// let mut builder = KeyframeBuilder::new();
/// let keyframes = Keyframes::new()
///     .stage(StageKey::From, Declarations::new().set("color", "blue"))
///     .stage(StageKey::To, Declarations::new().set("fontSize", "16px").set("color", "red"));
///
/// let (name, node) = builder.create(&keyframes, None).unwrap();
/// assert_eq!(name, "_x9ioxkw");
/// assert_eq!(&*node.css, "@keyframes _x9ioxkw{from{color:blue}to{font-size:16px;color:red}}");
/// ```
#[derive(Clone, Debug, Default)]
pub struct KeyframeBuilder<S = Cssify> {
    cache: KeyframeCache,
    serializer: S,
}

impl KeyframeBuilder<Cssify> {
    /// Create a builder using the default [`Cssify`] serializer.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: DeclarationSerializer> KeyframeBuilder<S> {
    /// Create a builder with a custom declaration serializer.
    pub fn with_serializer(serializer: S) -> Self {
        Self {
            cache: KeyframeCache::new(),
            serializer,
        }
    }

    /// Name a description and return its style node.
    ///
    /// The rule is serialized only the first time its name is seen; later
    /// calls return the cached text.
    pub fn create(
        &mut self,
        keyframes: &Keyframes,
        nonce: Option<&str>,
    ) -> Result<(AnimationName, StyleNode), KeyframeError> {
        let name = animation_name(keyframes)?;
        let serializer = &self.serializer;
        let css = self
            .cache
            .get_or_compute(&name, || keyframes_css(&name, keyframes, serializer));

        let node = StyleNode::new(css, name.clone(), nonce.map(str::to_string));
        Ok((name, node))
    }

    /// The underlying rule cache.
    pub fn cache(&self) -> &KeyframeCache {
        &self.cache
    }

    pub fn serializer(&self) -> &S {
        &self.serializer
    }

    /// Forget every cached rule.
    pub fn reset(&mut self) {
        self.cache.clear();
    }
}

static GLOBAL_BUILDER: OnceCell<Mutex<KeyframeBuilder>> = OnceCell::new();

fn global_builder() -> &'static Mutex<KeyframeBuilder> {
    GLOBAL_BUILDER.get_or_init(|| Mutex::new(KeyframeBuilder::new()))
}

/// Create a keyframe rule using the process-wide builder.
///
/// The lookup and the write on a miss happen under one lock, so concurrent
/// callers never serialize the same rule twice.
///
/// ## Example
///
/// ```rust
/// use css_keyframes::{create_keyframe, Declarations, Keyframes, StageKey};
///
/// let keyframes = Keyframes::new().stage(StageKey::To, Declarations::new().set("color", "red"));
/// let (name, node) = create_keyframe(&keyframes, Some("NONCE")).unwrap();
///
/// assert_eq!(name, "_x1nwcv5g");
/// assert_eq!(node.nonce.as_deref(), Some("NONCE"));
/// ```
pub fn create_keyframe(
    keyframes: &Keyframes,
    nonce: Option<&str>,
) -> Result<(AnimationName, StyleNode), KeyframeError> {
    global_builder().lock().create(keyframes, nonce)
}

/// Every rule held by the process-wide builder, in first-creation order.
pub fn global_stylesheet() -> String {
    global_builder().lock().cache().stylesheet()
}

/// Clear the process-wide cache.
pub fn reset_keyframe_cache() {
    global_builder().lock().reset();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Declarations, StageKey};
    use std::sync::Arc;

    fn red() -> Keyframes {
        Keyframes::new().stage(StageKey::To, Declarations::new().set("color", "red"))
    }

    fn blue_to_red() -> Keyframes {
        Keyframes::new()
            .stage(StageKey::From, Declarations::new().set("color", "blue"))
            .stage(
                StageKey::To,
                Declarations::new().set("fontSize", "16px").set("color", "red"),
            )
    }

    #[test]
    fn test_multi_stage_name_and_order() {
        let mut builder = KeyframeBuilder::new();
        let (name, node) = builder.create(&blue_to_red(), None).unwrap();

        assert_eq!(name, "_x9ioxkw");
        assert_eq!(
            &*node.css,
            "@keyframes _x9ioxkw{from{color:blue}to{font-size:16px;color:red}}"
        );
        assert!(node.css.find("from{").unwrap() < node.css.find("to{").unwrap());
    }

    #[test]
    fn test_reuses_cached_rule() {
        let mut builder = KeyframeBuilder::new();
        let (first, first_node) = builder.create(&red(), None).unwrap();
        let (second, second_node) = builder.create(&red(), None).unwrap();

        assert_eq!(first, "_x1nwcv5g");
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first_node.css, &second_node.css));
        assert_eq!(builder.cache().len(), 1);
    }

    #[test]
    fn test_nonce_passthrough() {
        let mut builder = KeyframeBuilder::new();
        let (_, with) = builder.create(&red(), Some("NONCE")).unwrap();
        let (_, without) = builder.create(&red(), None).unwrap();

        assert_eq!(with.nonce.as_deref(), Some("NONCE"));
        assert_eq!(without.nonce, None);
    }

    #[test]
    fn test_style_node_fields() {
        let mut builder = KeyframeBuilder::new();
        let (name, node) = builder.create(&red(), None).unwrap();

        assert_eq!(node.href, name);
        assert_eq!(node.precedence, "low");
        assert_eq!(&*node.css, "@keyframes _x1nwcv5g{to{color:red}}");
    }

    #[test]
    fn test_empty_description() {
        let mut builder = KeyframeBuilder::new();
        let (name, node) = builder.create(&Keyframes::new(), None).unwrap();

        assert_eq!(name, "_xmv1khr");
        assert_eq!(&*node.css, format!("@keyframes {}{{}}", name));
    }

    #[test]
    fn test_empty_stage() {
        let mut builder = KeyframeBuilder::new();
        let keyframes = Keyframes::new().stage(StageKey::percent(50.0).unwrap(), Declarations::new());
        let (name, node) = builder.create(&keyframes, None).unwrap();

        assert_eq!(&*node.css, format!("@keyframes {}{{50%{{}}}}", name));
    }

    #[test]
    fn test_order_changes_name() {
        let mut builder = KeyframeBuilder::new();
        let forward = Keyframes::new()
            .stage(StageKey::From, Declarations::new().set("opacity", 0))
            .stage(StageKey::To, Declarations::new().set("opacity", 1));
        let backward = Keyframes::new()
            .stage(StageKey::To, Declarations::new().set("opacity", 1))
            .stage(StageKey::From, Declarations::new().set("opacity", 0));

        let (a, _) = builder.create(&forward, None).unwrap();
        let (b, node) = builder.create(&backward, None).unwrap();

        assert_eq!(a, "_xi72150");
        assert_ne!(a, b);
        assert!(node.css.ends_with("{to{opacity:1}from{opacity:0}}"));
    }

    #[test]
    fn test_no_cross_key_interference() {
        let mut builder = KeyframeBuilder::new();
        let (red_name, red_node) = builder.create(&red(), None).unwrap();
        for _ in 0..3 {
            builder.create(&blue_to_red(), None).unwrap();
        }

        let cached = builder.cache().get(&red_name).unwrap();
        assert!(Arc::ptr_eq(&cached, &red_node.css));
        assert_eq!(builder.cache().len(), 2);
    }

    #[test]
    fn test_custom_serializer() {
        let mut builder = KeyframeBuilder::with_serializer(|decls: &Declarations| {
            decls
                .iter()
                .map(|(k, v)| format!("{}:{};", k, v))
                .collect::<String>()
        });
        let (_, node) = builder.create(&blue_to_red(), None).unwrap();

        assert_eq!(
            &*node.css,
            "@keyframes _x9ioxkw{from{color:blue;}to{fontSize:16px;color:red;}}"
        );
    }

    #[test]
    fn test_reset() {
        let mut builder = KeyframeBuilder::new();
        builder.create(&red(), None).unwrap();
        builder.reset();
        assert!(builder.cache().is_empty());
    }

    #[test]
    fn test_global_builder_is_deterministic() {
        let (first, _) = create_keyframe(&red(), None).unwrap();
        let (second, node) = create_keyframe(&red(), Some("NONCE")).unwrap();

        assert_eq!(first, "_x1nwcv5g");
        assert_eq!(first, second);
        assert_eq!(node.nonce.as_deref(), Some("NONCE"));
    }

    #[test]
    fn test_reset_keyframe_cache() {
        // Unique to this test, so concurrent global callers cannot recreate it.
        let keyframes = Keyframes::new().stage(
            StageKey::percent(42.0).unwrap(),
            Declarations::new().set("outlineWidth", "3px"),
        );
        let (name, node) = create_keyframe(&keyframes, None).unwrap();
        assert!(global_stylesheet().contains(&*node.css));

        reset_keyframe_cache();
        assert!(!global_stylesheet().contains(name.as_str()));

        let (again, _) = create_keyframe(&keyframes, None).unwrap();
        assert_eq!(again, name);
    }

    #[test]
    fn test_global_builder_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| create_keyframe(&blue_to_red(), None).unwrap().0))
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), "_x9ioxkw");
        }
    }
}
