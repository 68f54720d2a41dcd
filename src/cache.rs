//! Memoized `@keyframes` rules keyed by animation name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::AnimationName;

/// Unbounded store of serialized `@keyframes` rules.
///
/// Entries are written once per name and never replaced or evicted. Two
/// descriptions whose names collide share the rule of whichever was cached
/// first; the 32-bit name space makes this unlikely but not impossible.
#[derive(Clone, Debug, Default)]
pub struct KeyframeCache {
    rules: HashMap<AnimationName, Arc<str>>,
    /// First-insertion order, for stylesheet output
    order: Vec<AnimationName>,
}

impl KeyframeCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the rule cached under `name`, computing and storing it on a miss.
    ///
    /// `compute` only runs on a miss.
    ///
    /// ## Example
    ///
    /// ```rust
    /// use css_keyframes::KeyframeCache;
    ///
    /// # let name = css_keyframes::animation_name(&Default::default()).unwrap();
    /// let mut cache = KeyframeCache::new();
    /// let first = cache.get_or_compute(&name, || format!("@keyframes {name}{{}}"));
    /// let second = cache.get_or_compute(&name, || unreachable!());
    /// assert!(std::sync::Arc::ptr_eq(&first, &second));
    /// ```
    pub fn get_or_compute<F>(&mut self, name: &AnimationName, compute: F) -> Arc<str>
    where
        F: FnOnce() -> String,
    {
        if let Some(css) = self.rules.get(name) {
            tracing::trace!(name = %name, "keyframe cache hit");
            return Arc::clone(css);
        }

        let css: Arc<str> = Arc::from(compute());
        tracing::debug!(name = %name, len = css.len(), "keyframe cache miss, rule stored");
        self.rules.insert(name.clone(), Arc::clone(&css));
        self.order.push(name.clone());
        css
    }

    /// Get a cached rule without computing.
    pub fn get(&self, name: &AnimationName) -> Option<Arc<str>> {
        self.rules.get(name).cloned()
    }

    #[inline]
    pub fn contains(&self, name: &AnimationName) -> bool {
        self.rules.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// All cached rules concatenated in the order they were first stored.
    ///
    /// Useful for server-side rendering a single `<style>` block.
    pub fn stylesheet(&self) -> String {
        self.order
            .iter()
            .filter_map(|name| self.rules.get(name))
            .map(|css| &**css)
            .collect()
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        if !self.rules.is_empty() {
            tracing::debug!(entries = self.rules.len(), "keyframe cache cleared");
        }
        self.rules.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(canonical: &str) -> AnimationName {
        AnimationName::from_canonical(canonical)
    }

    #[test]
    fn test_miss_then_hit() {
        let mut cache = KeyframeCache::new();
        let key = name("a");
        let mut calls = 0;

        let first = cache.get_or_compute(&key, || {
            calls += 1;
            "@keyframes a{}".to_string()
        });
        let second = cache.get_or_compute(&key, || {
            calls += 1;
            "@keyframes other{}".to_string()
        });

        assert_eq!(calls, 1);
        assert_eq!(&*second, "@keyframes a{}");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_no_cross_key_interference() {
        let mut cache = KeyframeCache::new();
        let a = name("a");
        let b = name("b");

        cache.get_or_compute(&a, || "A".to_string());
        for _ in 0..3 {
            cache.get_or_compute(&b, || "B".to_string());
        }

        assert_eq!(cache.get(&a).as_deref(), Some("A"));
        assert_eq!(cache.get(&b).as_deref(), Some("B"));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_stylesheet_order() {
        let mut cache = KeyframeCache::new();
        cache.get_or_compute(&name("second"), || "@keyframes s{}".to_string());
        cache.get_or_compute(&name("first"), || "@keyframes f{}".to_string());
        cache.get_or_compute(&name("second"), || "ignored".to_string());

        assert_eq!(cache.stylesheet(), "@keyframes s{}@keyframes f{}");
    }

    #[test]
    fn test_clear() {
        let mut cache = KeyframeCache::new();
        let key = name("a");
        cache.get_or_compute(&key, || "A".to_string());
        cache.clear();

        assert!(cache.is_empty());
        assert!(!cache.contains(&key));
        assert_eq!(cache.stylesheet(), "");
    }
}
