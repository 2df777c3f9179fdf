//! Memo caches for listing and detail results.
//!
//! The gallery's records are stable across requests, so decoded results are
//! memoized for the life of the client. The default policy is unbounded,
//! preserving the grow-forever behavior callers already rely on; callers that
//! need a ceiling can bound a cache, which evicts in first-inserted order.

use std::borrow::Borrow;
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Capacity policy for a [`MemoCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Entries are kept for the life of the cache. This is the default.
    #[default]
    Unbounded,
    /// At most this many entries; the oldest insertion is evicted first.
    Bounded(usize),
}

/// An insertion-ordered memo map.
///
/// Overwriting a live key replaces its value in place: the key keeps its
/// original eviction slot and no entry is evicted for it.
#[derive(Debug, Clone)]
pub struct MemoCache<K, V> {
    policy: CachePolicy,
    map: HashMap<K, V>,
    order: VecDeque<K>,
}

impl<K, V> MemoCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Creates an empty cache under the given policy.
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            map: HashMap::new(),
            order: VecDeque::new(),
        }
    }

    /// The policy this cache was created with.
    #[must_use]
    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Looks up a cached value.
    #[must_use]
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.get(key)
    }

    /// Returns true when `key` is cached.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.map.contains_key(key)
    }

    /// Inserts a value, evicting the oldest insertions past a bounded
    /// capacity. Overwrites do not evict.
    pub fn insert(&mut self, key: K, value: V) {
        if self.map.insert(key.clone(), value).is_some() {
            return;
        }
        self.order.push_back(key);
        if let CachePolicy::Bounded(capacity) = self.policy {
            while self.order.len() > capacity {
                if let Some(oldest) = self.order.pop_front() {
                    self.map.remove(&oldest);
                }
            }
        }
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Returns true when nothing is cached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterates over cached entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.map.iter()
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::new(CachePolicy::default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unbounded_cache_keeps_everything() {
        let mut cache = MemoCache::new(CachePolicy::Unbounded);
        for i in 0..100 {
            cache.insert(i, i * 10);
        }
        assert_eq!(cache.len(), 100);
        assert_eq!(cache.get(&0), Some(&0));
        assert_eq!(cache.get(&99), Some(&990));
    }

    #[test]
    fn test_bounded_cache_evicts_oldest_insertion_first() {
        let mut cache = MemoCache::new(CachePolicy::Bounded(2));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), None, "oldest entry must be evicted");
        assert_eq!(cache.get("b"), Some(&2));
        assert_eq!(cache.get("c"), Some(&3));
    }

    #[test]
    fn test_overwrite_neither_evicts_nor_duplicates() {
        let mut cache = MemoCache::new(CachePolicy::Bounded(2));
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("a"), Some(&10));
        assert_eq!(cache.get("b"), Some(&2));

        // "a" still occupies the oldest slot, so the next insert drops it.
        cache.insert("c", 3);
        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.get("b"), Some(&2));
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = MemoCache::new(CachePolicy::Bounded(0));
        cache.insert("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_default_policy_is_unbounded() {
        let cache: MemoCache<String, String> = MemoCache::default();
        assert_eq!(cache.policy(), CachePolicy::Unbounded);
    }
}
