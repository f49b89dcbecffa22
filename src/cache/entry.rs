//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL and access tracking.

use serde::Serialize;

// == Cache Entry ==
/// A single cached value plus its expiry and access metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub data: V,
    /// Expiration timestamp (Unix milliseconds)
    pub expires_at: i64,
    /// Number of successful reads of this entry
    pub hits: u64,
    /// Last read or write (Unix milliseconds)
    pub last_accessed: i64,
    /// Approximate size in bytes of the JSON encoding
    pub size: usize,
    /// Monotonic access counter, orders entries touched within the same millisecond
    pub(crate) access_seq: u64,
}

impl<V: Serialize> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry expiring `ttl_seconds` from now.
    ///
    /// Zero or negative TTLs yield an entry that is already expired.
    pub fn new(data: V, ttl_seconds: i64, access_seq: u64) -> Self {
        let now = current_timestamp_ms();
        let size = calculate_size(&data);

        Self {
            data,
            expires_at: now.saturating_add(ttl_seconds.saturating_mul(1000)),
            hits: 0,
            last_accessed: now,
            size,
            access_seq,
        }
    }
}

impl<V> CacheEntry<V> {
    // == Is Expired ==
    /// An entry is expired once `now_ms` reaches `expires_at`.
    pub fn is_expired_at(&self, now_ms: i64) -> bool {
        now_ms >= self.expires_at
    }

    // == Touch ==
    /// Records a read: bumps the hit counter and the access time.
    pub fn touch(&mut self, access_seq: u64) {
        self.hits += 1;
        self.last_accessed = current_timestamp_ms();
        self.access_seq = access_seq;
    }
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Length of the JSON encoding, or 0 if the value does not serialize.
pub fn calculate_size<V: Serialize>(value: &V) -> usize {
    serde_json::to_string(value).map(|s| s.len()).unwrap_or(0)
}
