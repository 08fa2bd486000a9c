//! Suggestion cache
//!
//! Bounded least-recently-used map from preceding text to suggestion text.
//! Keys are used exactly as extracted: case and whitespace sensitive.

use std::num::NonZeroUsize;

use lru::LruCache;

/// Default number of cached suggestions
pub const DEFAULT_CACHE_CAPACITY: usize = 25;

#[derive(Debug)]
pub struct SuggestionCache {
    entries: LruCache<String, String>,
}

impl Default for SuggestionCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl SuggestionCache {
    /// Create a cache holding at most `capacity` entries (minimum 1)
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: LruCache::new(clamp_capacity(capacity)),
        }
    }

    /// Look up a suggestion, promoting the entry to most recently used
    pub fn get(&mut self, leading_text: &str) -> Option<String> {
        self.entries.get(leading_text).cloned()
    }

    /// Store a suggestion, evicting the least recently used entry when full
    pub fn set(&mut self, leading_text: String, suggestion: String) {
        self.entries.put(leading_text, suggestion);
    }

    pub fn contains(&self, leading_text: &str) -> bool {
        self.entries.contains(leading_text)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Change the capacity, evicting least recently used entries if shrinking
    pub fn resize(&mut self, capacity: usize) {
        self.entries.resize(clamp_capacity(capacity));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

fn clamp_capacity(capacity: usize) -> NonZeroUsize {
    NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_default_capacity() {
        let cache = SuggestionCache::default();
        assert_eq!(cache.capacity(), 25);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_get_miss() {
        let mut cache = SuggestionCache::new(4);
        assert_eq!(cache.get("hello "), None);
    }

    #[test]
    fn test_set_then_get() {
        let mut cache = SuggestionCache::new(4);
        cache.set("hello ".to_string(), "world".to_string());
        assert_eq!(cache.get("hello "), Some("world".to_string()));
    }

    #[test]
    fn test_keys_are_whitespace_and_case_sensitive() {
        let mut cache = SuggestionCache::new(4);
        cache.set("Hello ".to_string(), "world".to_string());
        assert_eq!(cache.get("hello "), None);
        assert_eq!(cache.get("Hello"), None);
        assert_eq!(cache.get("Hello "), Some("world".to_string()));
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let mut cache = SuggestionCache::new(2);
        cache.set("a".to_string(), "1".to_string());
        cache.set("b".to_string(), "2".to_string());
        cache.set("c".to_string(), "3".to_string());

        assert!(!cache.contains("a"));
        assert!(cache.contains("b"));
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_get_promotes_entry() {
        let mut cache = SuggestionCache::new(2);
        cache.set("a".to_string(), "1".to_string());
        cache.set("b".to_string(), "2".to_string());

        // "a" becomes most recently used, so "b" is evicted next
        assert!(cache.get("a").is_some());
        cache.set("c".to_string(), "3".to_string());

        assert!(cache.contains("a"));
        assert!(!cache.contains("b"));
    }

    #[test]
    fn test_set_overwrites_existing_key() {
        let mut cache = SuggestionCache::new(2);
        cache.set("a".to_string(), "1".to_string());
        cache.set("a".to_string(), "2".to_string());
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some("2".to_string()));
    }

    #[test]
    fn test_zero_capacity_clamped_to_one() {
        let mut cache = SuggestionCache::new(0);
        assert_eq!(cache.capacity(), 1);
        cache.set("a".to_string(), "1".to_string());
        assert_eq!(cache.get("a"), Some("1".to_string()));
    }

    #[test]
    fn test_resize_shrinks() {
        let mut cache = SuggestionCache::new(3);
        cache.set("a".to_string(), "1".to_string());
        cache.set("b".to_string(), "2".to_string());
        cache.set("c".to_string(), "3".to_string());

        cache.resize(1);
        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains("c"));
    }

    #[test]
    fn test_clear() {
        let mut cache = SuggestionCache::new(3);
        cache.set("a".to_string(), "1".to_string());
        cache.clear();
        assert!(cache.is_empty());
    }

    // For any sequence of insertions the cache never exceeds its capacity,
    // and the most recent insertion is always retrievable.
    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_bounded_and_latest_retained(
            capacity in 1usize..10,
            keys in prop::collection::vec("[a-e]{1,3}", 1..40),
        ) {
            let mut cache = SuggestionCache::new(capacity);
            for (index, key) in keys.iter().enumerate() {
                cache.set(key.clone(), index.to_string());
                prop_assert!(cache.len() <= capacity);
                prop_assert_eq!(cache.get(key), Some(index.to_string()));
            }
        }
    }
}
