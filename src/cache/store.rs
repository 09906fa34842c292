//! Cache Store Module
//!
//! Bounded cache engine combining HashMap storage with LRU tracking.

use std::collections::HashMap;

use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheStats, LruTracker};

// == Cache Store ==
/// Bounded key -> entry storage with LRU eviction.
///
/// Every operation is total. The store is not internally synchronized;
/// share it behind a mutex, since `get` reorders recency.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<CacheKey, CacheEntry>,
    /// LRU access tracker
    lru: LruTracker,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a new CacheStore holding at most `capacity` entries.
    ///
    /// A capacity of zero is accepted and caches nothing.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            lru: LruTracker::with_capacity(capacity),
            stats: CacheStats::new(capacity),
            capacity,
        }
    }

    // == Put ==
    /// Inserts or replaces an entry and marks it most recently used.
    ///
    /// If the insertion grows the store past its capacity, the least
    /// recently used entry is evicted and its key returned. At most one
    /// entry is evicted per call.
    pub fn put(&mut self, key: CacheKey, entry: CacheEntry) -> Option<CacheKey> {
        self.lru.touch(&key);
        self.entries.insert(key, entry);
        debug_assert_eq!(self.lru.len(), self.entries.len());

        let evicted = if self.entries.len() > self.capacity {
            self.lru.evict_oldest().map(|evicted| {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "Evicted least recently used entry");
                evicted
            })
        } else {
            None
        };

        self.stats.set_total_entries(self.entries.len());
        evicted
    }

    // == Get ==
    /// Retrieves an entry by key, marking it most recently used on a hit.
    ///
    /// A miss leaves the recency order untouched.
    pub fn get(&mut self, key: &CacheKey) -> Option<CacheEntry> {
        match self.entries.get(key) {
            Some(entry) => {
                let entry = entry.clone();
                self.lru.touch(key);
                self.stats.record_hit();
                Some(entry)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Len ==
    /// Returns the number of cached entries.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
impl CacheStore {
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Checks for a key without promoting it or touching statistics.
    pub(crate) fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys from most to least recently used.
    pub(crate) fn keys_by_recency(&self) -> impl Iterator<Item = &CacheKey> + '_ {
        self.lru.iter()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> CacheKey {
        CacheKey::from(raw)
    }

    fn entry(body: &str) -> CacheEntry {
        CacheEntry::new(body.as_bytes().to_vec(), body.len() as u64, "text/plain")
    }

    fn keys(store: &CacheStore) -> Vec<String> {
        store.keys_by_recency().map(|k| k.to_string()).collect()
    }

    #[test]
    fn test_store_new() {
        let store = CacheStore::new(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.stats().capacity, 100);
    }

    #[test]
    fn test_store_put_and_get() {
        let mut store = CacheStore::new(100);

        store.put(key("key1"), entry("value1"));
        let found = store.get(&key("key1")).unwrap();

        assert_eq!(found.bytes.as_ref(), b"value1");
        assert_eq!(found.length, 6);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = CacheStore::new(100);
        assert!(store.get(&key("nonexistent")).is_none());
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = CacheStore::new(100);

        store.put(key("key1"), entry("value1"));
        store.put(key("key1"), entry("value2"));

        let found = store.get(&key("key1")).unwrap();
        assert_eq!(found.bytes.as_ref(), b"value2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_overwrite_at_capacity_does_not_evict() {
        let mut store = CacheStore::new(2);

        store.put(key("a"), entry("1"));
        store.put(key("b"), entry("2"));
        let evicted = store.put(key("a"), entry("3"));

        assert_eq!(evicted, None);
        assert_eq!(keys(&store), vec!["a", "b"]);
        assert_eq!(store.stats().evictions, 0);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = CacheStore::new(3);

        store.put(key("key1"), entry("value1"));
        store.put(key("key2"), entry("value2"));
        store.put(key("key3"), entry("value3"));
        let evicted = store.put(key("key4"), entry("value4"));

        assert_eq!(evicted, Some(key("key1")));
        assert_eq!(store.len(), 3);
        assert!(store.get(&key("key1")).is_none());
        assert!(store.get(&key("key2")).is_some());
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = CacheStore::new(3);

        store.put(key("key1"), entry("value1"));
        store.put(key("key2"), entry("value2"));
        store.put(key("key3"), entry("value3"));

        store.get(&key("key1")).unwrap();

        let evicted = store.put(key("key4"), entry("value4"));
        assert_eq!(evicted, Some(key("key2")));
        assert!(store.contains(&key("key1")));
        assert!(!store.contains(&key("key2")));
    }

    #[test]
    fn test_store_two_slot_scenario() {
        let mut store = CacheStore::new(2);

        store.put(key("A"), entry("a"));
        store.put(key("B"), entry("b"));
        store.put(key("C"), entry("c"));
        assert_eq!(keys(&store), vec!["C", "B"]);

        store.get(&key("B")).unwrap();
        store.put(key("D"), entry("d"));

        assert_eq!(keys(&store), vec!["D", "B"]);
        assert!(!store.contains(&key("A")));
        assert!(!store.contains(&key("C")));
    }

    #[test]
    fn test_store_miss_does_not_reorder() {
        let mut store = CacheStore::new(2);

        store.put(key("a"), entry("1"));
        store.put(key("b"), entry("2"));
        assert!(store.get(&key("zzz")).is_none());

        assert_eq!(store.put(key("c"), entry("3")), Some(key("a")));
    }

    #[test]
    fn test_store_contains_does_not_promote() {
        let mut store = CacheStore::new(2);

        store.put(key("a"), entry("1"));
        store.put(key("b"), entry("2"));
        assert!(store.contains(&key("a")));

        assert_eq!(store.put(key("c"), entry("3")), Some(key("a")));
        assert_eq!(store.stats().hits, 0);
    }

    #[test]
    fn test_store_zero_capacity_caches_nothing() {
        let mut store = CacheStore::new(0);

        let evicted = store.put(key("a"), entry("1"));

        assert_eq!(evicted, Some(key("a")));
        assert!(store.is_empty());
        assert!(store.get(&key("a")).is_none());
    }

    #[test]
    fn test_store_stats() {
        let mut store = CacheStore::new(1);

        store.put(key("key1"), entry("value1"));
        store.get(&key("key1")).unwrap();
        let _ = store.get(&key("nonexistent"));
        store.put(key("key2"), entry("value2"));

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.evictions, 1);
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.capacity, 1);
    }
}
