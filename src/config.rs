//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::repository::CachePolicy;

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Maximum number of entries the cache can hold
    pub cache_max_entries: usize,
    /// TTL in seconds for single-record cache entries
    pub entity_ttl: u64,
    /// TTL in seconds for list/page cache entries
    pub list_ttl: u64,
    /// Background cleanup task interval in seconds
    pub cleanup_interval: u64,
    /// Page size used when a list request omits one
    pub default_page_size: u32,
    /// Largest page size a list request may ask for
    pub max_page_size: u32,
    /// Seed a handful of demo auctions at startup
    pub seed_demo_data: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10000)
    /// - `CACHE_ENTITY_TTL` - Single-record TTL in seconds (default: 600)
    /// - `CACHE_LIST_TTL` - List/page TTL in seconds (default: 60)
    /// - `CACHE_CLEANUP_INTERVAL` - Cleanup frequency in seconds (default: 5)
    /// - `DEFAULT_PAGE_SIZE` - Page size when none is requested (default: 20)
    /// - `MAX_PAGE_SIZE` - Upper bound for requested page sizes (default: 100)
    /// - `SEED_DEMO_DATA` - Seed demo auctions on startup (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cache_max_entries: env_or("CACHE_MAX_ENTRIES", defaults.cache_max_entries),
            entity_ttl: env_or("CACHE_ENTITY_TTL", defaults.entity_ttl),
            list_ttl: env_or("CACHE_LIST_TTL", defaults.list_ttl),
            cleanup_interval: env_or("CACHE_CLEANUP_INTERVAL", defaults.cleanup_interval),
            default_page_size: env_or("DEFAULT_PAGE_SIZE", defaults.default_page_size),
            max_page_size: env_or("MAX_PAGE_SIZE", defaults.max_page_size),
            seed_demo_data: env_or("SEED_DEMO_DATA", defaults.seed_demo_data),
        }
    }

    /// Cache TTLs per resource class.
    pub fn cache_policy(&self) -> CachePolicy {
        CachePolicy {
            entity_ttl: Duration::from_secs(self.entity_ttl),
            list_ttl: Duration::from_secs(self.list_ttl),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            cache_max_entries: 10_000,
            entity_ttl: 600,
            list_ttl: 60,
            cleanup_interval: 5,
            default_page_size: 20,
            max_page_size: 100,
            seed_demo_data: false,
        }
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.entity_ttl, 600);
        assert_eq!(config.list_ttl, 60);
        assert_eq!(config.default_page_size, 20);
        assert!(!config.seed_demo_data);
    }

    #[test]
    fn test_config_from_env_defaults() {
        for name in [
            "SERVER_PORT",
            "CACHE_MAX_ENTRIES",
            "CACHE_ENTITY_TTL",
            "CACHE_LIST_TTL",
            "CACHE_CLEANUP_INTERVAL",
            "DEFAULT_PAGE_SIZE",
            "MAX_PAGE_SIZE",
            "SEED_DEMO_DATA",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.cleanup_interval, 5);
        assert_eq!(config.max_page_size, 100);
    }

    #[test]
    fn test_env_or_ignores_garbage() {
        env::set_var("AUCTION_CATALOG_TEST_GARBAGE", "not-a-number");
        assert_eq!(env_or("AUCTION_CATALOG_TEST_GARBAGE", 7u32), 7);
        env::remove_var("AUCTION_CATALOG_TEST_GARBAGE");
    }

    #[test]
    fn test_cache_policy_from_config() {
        let policy = Config::default().cache_policy();
        assert_eq!(policy.entity_ttl, Duration::from_secs(600));
        assert_eq!(policy.list_ttl, Duration::from_secs(60));
        assert!(policy.list_ttl < policy.entity_ttl);
    }
}
