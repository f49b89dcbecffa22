//! Cache Statistics Module
//!
//! Tracks cumulative counters and builds the point-in-time statistics snapshot.

use serde::Serialize;

// == Counters ==
/// Cumulative counters. Never reset by `clear`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheCounters {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
}

impl CacheCounters {
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_set(&mut self) {
        self.sets += 1;
    }

    pub fn record_delete(&mut self) {
        self.deletes += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Cache Stats ==
/// Snapshot of cache effectiveness and occupancy.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub sets: u64,
    pub deletes: u64,
    pub evictions: u64,
    /// Current number of entries
    pub size: usize,
    pub max_size: usize,
    /// size / max_size, in percent
    pub utilization: f64,
    /// Sum of entry sizes in bytes
    pub total_size: usize,
    /// Mean per-entry hit count
    pub avg_hits: f64,
    /// hits / (hits + misses), in percent
    pub hit_rate: f64,
}

impl CacheStats {
    /// Builds a snapshot from the counters and per-entry `(size, hits)` pairs.
    pub fn snapshot(
        counters: CacheCounters,
        max_size: usize,
        entries: impl Iterator<Item = (usize, u64)>,
    ) -> Self {
        let mut size = 0usize;
        let mut total_size = 0usize;
        let mut total_hits = 0u64;
        for (bytes, hits) in entries {
            size += 1;
            total_size += bytes;
            total_hits += hits;
        }

        Self {
            hits: counters.hits,
            misses: counters.misses,
            sets: counters.sets,
            deletes: counters.deletes,
            evictions: counters.evictions,
            size,
            max_size,
            utilization: percentage(size as f64, max_size as f64),
            total_size,
            avg_hits: if size == 0 {
                0.0
            } else {
                total_hits as f64 / size as f64
            },
            hit_rate: percentage(
                counters.hits as f64,
                (counters.hits + counters.misses) as f64,
            ),
        }
    }
}

fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
