//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_entries: usize,
    /// Default TTL in seconds for entries without explicit TTL
    pub default_ttl: i64,
    /// HTTP server port
    pub server_port: u16,
    /// Cache cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Pause between two items of a bulk operation, in milliseconds
    pub bulk_item_delay_ms: u64,
    /// Per-item timeout in seconds, 0 disables it
    pub bulk_item_timeout_secs: u64,
    /// How long terminal bulk operations are kept, in days
    pub operation_retention_days: i64,
    /// Operation registry cleanup interval in seconds
    pub operation_cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries, 0 falls back to the default (default: 1000)
    /// - `DEFAULT_TTL` - Default TTL in seconds (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Cache cleanup frequency in seconds (default: 60)
    /// - `BULK_ITEM_DELAY_MS` - Delay between bulk items (default: 50)
    /// - `BULK_ITEM_TIMEOUT_SECS` - Per-item timeout, 0 = none (default: 30)
    /// - `OPERATION_RETENTION_DAYS` - Retention of finished operations (default: 7)
    /// - `OPERATION_CLEANUP_INTERVAL` - Registry cleanup frequency in seconds (default: 86400)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: nonzero_env_or("MAX_ENTRIES", defaults.max_entries),
            default_ttl: env_or("DEFAULT_TTL", defaults.default_ttl),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
            bulk_item_delay_ms: env_or("BULK_ITEM_DELAY_MS", defaults.bulk_item_delay_ms),
            bulk_item_timeout_secs: env_or(
                "BULK_ITEM_TIMEOUT_SECS",
                defaults.bulk_item_timeout_secs,
            ),
            operation_retention_days: env_or(
                "OPERATION_RETENTION_DAYS",
                defaults.operation_retention_days,
            ),
            operation_cleanup_interval: env_or(
                "OPERATION_CLEANUP_INTERVAL",
                defaults.operation_cleanup_interval,
            ),
        }
    }

    /// Delay inserted between bulk items.
    pub fn item_delay(&self) -> Duration {
        Duration::from_millis(self.bulk_item_delay_ms)
    }

    /// Per-item timeout, if enabled.
    pub fn item_timeout(&self) -> Option<Duration> {
        (self.bulk_item_timeout_secs > 0).then(|| Duration::from_secs(self.bulk_item_timeout_secs))
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Like `env_or`, but a zero value also falls back to `default`.
fn nonzero_env_or(name: &str, default: usize) -> usize {
    match env_or(name, default) {
        0 => default,
        value => value,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: 300,
            server_port: 3000,
            cleanup_interval: 60,
            bulk_item_delay_ms: 50,
            bulk_item_timeout_secs: 30,
            operation_retention_days: 7,
            operation_cleanup_interval: 24 * 60 * 60,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.max_entries, 1000);
        assert_eq!(config.default_ttl, 300);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 60);
        assert_eq!(config.operation_retention_days, 7);
        assert_eq!(config.item_delay(), Duration::from_millis(50));
        assert_eq!(config.item_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_zero_timeout_disables_it() {
        let config = Config {
            bulk_item_timeout_secs: 0,
            ..Config::default()
        };
        assert!(config.item_timeout().is_none());
    }

    #[test]
    fn test_env_or_falls_back_on_garbage() {
        env::set_var("DERNEK_TEST_GARBAGE_PORT", "not-a-number");
        assert_eq!(env_or("DERNEK_TEST_GARBAGE_PORT", 3000u16), 3000);
        env::remove_var("DERNEK_TEST_GARBAGE_PORT");
        assert_eq!(env_or("DERNEK_TEST_GARBAGE_PORT", 42u16), 42);
    }

    #[test]
    fn test_zero_capacity_falls_back_to_default() {
        env::set_var("DERNEK_TEST_ZERO_ENTRIES", "0");
        assert_eq!(nonzero_env_or("DERNEK_TEST_ZERO_ENTRIES", 1000), 1000);
        env::set_var("DERNEK_TEST_ZERO_ENTRIES", "25");
        assert_eq!(nonzero_env_or("DERNEK_TEST_ZERO_ENTRIES", 1000), 25);
        env::remove_var("DERNEK_TEST_ZERO_ENTRIES");
    }
}
