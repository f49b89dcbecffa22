//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with access-time LRU eviction and TTL expiration.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::cache::{current_timestamp_ms, CacheCounters, CacheEntry, CacheStats, KeyPattern};

// == Cache Options ==
/// Per-call options for `CacheStore::set`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheOptions {
    /// TTL in seconds; the store default applies when `None`
    pub ttl_seconds: Option<i64>,
}

impl CacheOptions {
    pub fn with_ttl(ttl_seconds: i64) -> Self {
        Self {
            ttl_seconds: Some(ttl_seconds),
        }
    }
}

// == Cache Store ==
/// Bounded TTL cache with least-recently-accessed eviction.
///
/// The store is not synchronized; callers share it behind a lock.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Cumulative statistics
    counters: CacheCounters,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Default TTL in seconds for entries without explicit TTL
    default_ttl: i64,
    /// Source of access sequence numbers
    clock: u64,
}

impl<V: Clone + Serialize> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with specified capacity and default TTL.
    pub fn new(max_size: usize, default_ttl: i64) -> Self {
        Self {
            entries: HashMap::new(),
            counters: CacheCounters::default(),
            max_size,
            default_ttl,
            clock: 0,
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    // == Get ==
    /// Returns a clone of the value if present and not expired.
    ///
    /// Expired entries are removed and counted as misses.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = current_timestamp_ms();
        let expired = match self.entries.get(key) {
            None => {
                self.counters.record_miss();
                return None;
            }
            Some(entry) => entry.is_expired_at(now),
        };

        if expired {
            self.entries.remove(key);
            self.counters.record_miss();
            return None;
        }

        let seq = self.tick();
        let entry = self.entries.get_mut(key)?;
        entry.touch(seq);
        self.counters.record_hit();
        Some(entry.data.clone())
    }

    // == Set ==
    /// Stores a value.
    ///
    /// When the cache is full and `key` is new, the least recently accessed
    /// entry is evicted first. Overwriting an existing key resets its TTL and
    /// statistics. A zero-capacity store keeps nothing.
    pub fn set(&mut self, key: impl Into<String>, value: V, options: CacheOptions) {
        let key = key.into();
        let ttl = options.ttl_seconds.unwrap_or(self.default_ttl);

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            self.evict_lru();
            if self.entries.len() >= self.max_size {
                debug!(key = %key, "Cache has no capacity, value not stored");
                return;
            }
        }

        let seq = self.tick();
        self.entries.insert(key, CacheEntry::new(value, ttl, seq));
        self.counters.record_set();
    }

    // == Delete ==
    /// Removes an entry, returning whether it existed.
    pub fn delete(&mut self, key: &str) -> bool {
        let existed = self.entries.remove(key).is_some();
        if existed {
            self.counters.record_delete();
        }
        existed
    }

    // == Has ==
    /// Existence check with lazy expiry. Does not affect statistics.
    pub fn has(&mut self, key: &str) -> bool {
        let now = current_timestamp_ms();
        match self.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired_at(now) => {
                self.entries.remove(key);
                false
            }
            Some(_) => true,
        }
    }

    // == Clear ==
    /// Drops every entry. Cumulative statistics are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    // == Cleanup ==
    /// Removes all expired entries and returns how many were removed.
    pub fn cleanup(&mut self) -> usize {
        let now = current_timestamp_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        before - self.entries.len()
    }

    // == Keys ==
    /// Lists keys, optionally filtered by a glob pattern.
    pub fn keys(&self, pattern: Option<&str>) -> Vec<String> {
        match pattern {
            None => self.entries.keys().cloned().collect(),
            Some(glob) => {
                let pattern = KeyPattern::new(glob);
                self.entries
                    .keys()
                    .filter(|key| pattern.matches(key))
                    .cloned()
                    .collect()
            }
        }
    }

    // == Delete Pattern ==
    /// Removes every key matching the glob, returning the count.
    pub fn delete_pattern(&mut self, glob: &str) -> usize {
        let pattern = KeyPattern::new(glob);
        let before = self.entries.len();
        self.entries.retain(|key, _| !pattern.matches(key));
        before - self.entries.len()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        CacheStats::snapshot(
            self.counters,
            self.max_size,
            self.entries.values().map(|entry| (entry.size, entry.hits)),
        )
    }

    // == Length ==
    /// Returns the number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Evict LRU ==
    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.last_accessed, entry.access_seq))
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.counters.record_eviction();
            debug!(key = %key, "Evicted least recently used cache entry");
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn store(max: usize) -> CacheStore<Value> {
        CacheStore::new(max, 300)
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
    }

    #[test]
    fn test_store_set_and_get() {
        let mut store = store(100);
        let value = json!({"id": "b-1", "tags": ["yetim", "aile"]});

        store.set("beneficiary:b-1", value.clone(), CacheOptions::default());

        assert_eq!(store.get("beneficiary:b-1"), Some(value));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);
        assert!(store.get("missing").is_none());
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_zero_ttl_is_immediately_absent() {
        let mut store = store(100);
        store.set("k", json!(1), CacheOptions::with_ttl(0));

        assert!(store.get("k").is_none());
        assert!(store.is_empty(), "expired entry should be purged on read");
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_store_delete() {
        let mut store = store(100);
        store.set("k", json!("v"), CacheOptions::default());

        assert!(store.delete("k"));
        assert!(!store.delete("k"));
        assert!(store.get("k").is_none());
        assert_eq!(store.stats().deletes, 1);
    }

    #[test]
    fn test_store_overwrite() {
        let mut store = store(100);
        store.set("k", json!("v1"), CacheOptions::default());
        store.set("k", json!("v2"), CacheOptions::default());

        assert_eq!(store.get("k"), Some(json!("v2")));
        assert_eq!(store.len(), 1);
        assert_eq!(store.stats().sets, 2);
    }

    #[test]
    fn test_store_lru_eviction() {
        let mut store = store(3);
        store.set("key1", json!(1), CacheOptions::default());
        store.set("key2", json!(2), CacheOptions::default());
        store.set("key3", json!(3), CacheOptions::default());

        store.set("key4", json!(4), CacheOptions::default());

        assert_eq!(store.len(), 3);
        assert_eq!(store.stats().evictions, 1);
        assert!(!store.has("key1"));
        assert_eq!(store.get("key4"), Some(json!(4)));
    }

    #[test]
    fn test_store_lru_touch_on_get() {
        let mut store = store(3);
        store.set("key1", json!(1), CacheOptions::default());
        store.set("key2", json!(2), CacheOptions::default());
        store.set("key3", json!(3), CacheOptions::default());

        store.get("key1");
        store.set("key4", json!(4), CacheOptions::default());

        assert!(store.has("key1"));
        assert!(!store.has("key2"));
    }

    #[test]
    fn test_overwrite_at_capacity_evicts_nothing() {
        let mut store = store(2);
        store.set("a", json!(1), CacheOptions::default());
        store.set("b", json!(2), CacheOptions::default());
        store.set("a", json!(10), CacheOptions::default());

        assert_eq!(store.len(), 2);
        assert_eq!(store.stats().evictions, 0);
        assert!(store.has("b"));
    }

    #[test]
    fn test_has_does_not_touch_stats() {
        let mut store = store(10);
        store.set("k", json!(1), CacheOptions::default());

        assert!(store.has("k"));
        assert!(!store.has("other"));

        let stats = store.stats();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
    }

    #[test]
    fn test_has_purges_expired() {
        let mut store = store(10);
        store.set("k", json!(1), CacheOptions::with_ttl(-1));

        assert!(!store.has("k"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_clear_keeps_counters() {
        let mut store = store(10);
        store.set("k", json!(1), CacheOptions::default());
        store.get("k");
        store.clear();

        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.sets, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let mut store = store(10);
        store.set("old1", json!(1), CacheOptions::with_ttl(0));
        store.set("old2", json!(2), CacheOptions::with_ttl(-5));
        store.set("fresh", json!(3), CacheOptions::with_ttl(60));

        assert_eq!(store.cleanup(), 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("fresh"), Some(json!(3)));
    }

    #[test]
    fn test_keys_with_pattern() {
        let mut store = store(10);
        store.set("donation:1", json!(1), CacheOptions::default());
        store.set("donation:2", json!(2), CacheOptions::default());
        store.set("task:1", json!(3), CacheOptions::default());

        let mut keys = store.keys(Some("donation:*"));
        keys.sort();
        assert_eq!(keys, vec!["donation:1", "donation:2"]);
        assert_eq!(store.keys(None).len(), 3);
    }

    #[test]
    fn test_delete_pattern() {
        let mut store = store(10);
        store.set("api:/donations", json!(1), CacheOptions::default());
        store.set("api:/tasks", json!(2), CacheOptions::default());
        store.set("user:1", json!(3), CacheOptions::default());

        assert_eq!(store.delete_pattern("api:*"), 2);
        assert_eq!(store.keys(None), vec!["user:1".to_string()]);
    }

    #[test]
    fn test_stats_entry_figures() {
        let mut store = store(4);
        store.set("a", json!("xx"), CacheOptions::default());
        store.set("b", json!("yyyy"), CacheOptions::default());
        store.get("a");
        store.get("a");

        let stats = store.stats();
        assert_eq!(stats.size, 2);
        assert_eq!(stats.total_size, 4 + 6);
        assert_eq!(stats.avg_hits, 1.0);
        assert_eq!(stats.utilization, 50.0);
    }

    #[test]
    fn test_typed_store() {
        #[derive(Debug, Clone, PartialEq, Serialize)]
        struct Donation {
            amount: u32,
            currency: &'static str,
        }

        let mut store: CacheStore<Donation> = CacheStore::new(2, 60);
        let donation = Donation {
            amount: 250,
            currency: "TRY",
        };
        store.set("d", donation.clone(), CacheOptions::default());
        assert_eq!(store.get("d"), Some(donation));
    }

    #[test]
    fn test_zero_capacity_never_stores() {
        let mut store = store(0);
        store.set("a", json!(1), CacheOptions::default());

        assert!(store.is_empty());
        assert_eq!(store.get("a"), None);
        let stats = store.stats();
        assert_eq!(stats.size, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.utilization, 0.0);
    }
}
