//! Cache Module
//!
//! Provides in-memory caching with TTL expiration, LRU eviction and hit/miss statistics.

mod entry;
mod pattern;
mod stats;
mod store;


// Re-export public types
pub use entry::{calculate_size, current_timestamp_ms, CacheEntry};
pub use pattern::KeyPattern;
pub use stats::{CacheCounters, CacheStats};
pub use store::{CacheOptions, CacheStore};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;
