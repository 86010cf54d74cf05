//! Cache Store Module
//!
//! Synchronous cache engine: HashMap storage with LRU capacity eviction and
//! per-entry TTL. `MemoryCache` wraps it for shared async access.

use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{CacheEntry, CacheStats, LruTracker, MAX_KEY_LENGTH, MAX_VALUE_SIZE};
use crate::error::CacheError;

// == Cache Store ==
#[derive(Debug)]
pub struct CacheStore {
    entries: HashMap<String, CacheEntry>,
    lru: LruTracker,
    stats: CacheStats,
    max_entries: usize,
}

impl CacheStore {
    // == Constructor ==
    /// Creates a store holding at most `max_entries` entries.
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_entries: max_entries.max(1),
        }
    }

    // == Set ==
    /// Stores `value` under `key` for `ttl`.
    ///
    /// Overwrites reset the TTL. At capacity the least recently used entry
    /// is evicted first.
    pub fn set(&mut self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        if key.is_empty() || key.len() > MAX_KEY_LENGTH {
            return Err(CacheError::InvalidKey(format!(
                "key must be 1..={} bytes, got {}",
                MAX_KEY_LENGTH,
                key.len()
            )));
        }
        if value.len() > MAX_VALUE_SIZE {
            return Err(CacheError::ValueTooLarge(value.len()));
        }

        let is_overwrite = self.entries.contains_key(key);
        if !is_overwrite && self.entries.len() >= self.max_entries {
            match self.lru.evict_oldest() {
                Some(evicted) => {
                    self.entries.remove(&evicted);
                    self.stats.record_eviction();
                }
                None => {
                    return Err(CacheError::Full(
                        "cache is full and eviction failed".to_string(),
                    ))
                }
            }
        }

        self.entries
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        self.lru.touch(key);
        self.stats.set_total_entries(self.entries.len());

        Ok(())
    }

    // == Get ==
    /// Returns the live value for `key`.
    ///
    /// A missing or expired entry is a miss; expired entries are dropped.
    pub fn get(&mut self, key: &str) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) if entry.is_expired() => true,
            Some(entry) => {
                let value = entry.value.clone();
                self.stats.record_hit();
                self.lru.touch(key);
                return Some(value);
            }
            None => false,
        };

        if expired {
            self.entries.remove(key);
            self.lru.remove(key);
            self.stats.set_total_entries(self.entries.len());
        }
        self.stats.record_miss();
        None
    }

    // == Remove ==
    /// Removes `key`. Removing an absent key is a no-op.
    ///
    /// Returns whether an entry was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            self.lru.remove(key);
            self.stats.record_invalidations(1);
            self.stats.set_total_entries(self.entries.len());
        }
        removed
    }

    // == Remove Prefix ==
    /// Removes every key starting with `prefix` and returns how many went.
    pub fn remove_prefix(&mut self, prefix: &str) -> usize {
        let doomed: Vec<String> = self
            .entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();

        for key in &doomed {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.record_invalidations(doomed.len());
        self.stats.set_total_entries(self.entries.len());
        doomed.len()
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Cleanup Expired ==
    /// Drops every expired entry and returns how many were removed.
    pub fn cleanup_expired(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }

        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            self.entries.remove(key);
            self.lru.remove(key);
        }

        self.stats.set_total_entries(self.entries.len());
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a live entry exists, without touching stats or LRU order.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(300);

    #[test]
    fn test_set_and_get() {
        let mut store = CacheStore::new(100);
        store.set("auction:id:id=1", "{\"a\":1}".to_string(), TTL).unwrap();

        assert_eq!(store.get("auction:id:id=1").as_deref(), Some("{\"a\":1}"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_get_missing_is_miss() {
        let mut store = CacheStore::new(100);
        assert_eq!(store.get("missing"), None);
        assert_eq!(store.stats().misses, 1);
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut store = CacheStore::new(100);
        store.set("k", "v".to_string(), TTL).unwrap();

        assert!(store.remove("k"));
        assert!(!store.remove("k"));
        assert!(store.is_empty());
        assert_eq!(store.stats().invalidations, 1);
    }

    #[test]
    fn test_remove_prefix() {
        let mut store = CacheStore::new(100);
        store.set("auction:list:page=1", "a".to_string(), TTL).unwrap();
        store.set("auction:list:page=2", "b".to_string(), TTL).unwrap();
        store.set("auction:id:id=7", "c".to_string(), TTL).unwrap();
        store.set("review:list:page=1", "d".to_string(), TTL).unwrap();

        assert_eq!(store.remove_prefix("auction:list:"), 2);
        assert!(store.contains("auction:id:id=7"));
        assert!(store.contains("review:list:page=1"));
        assert_eq!(store.remove_prefix("auction:list:"), 0);
    }

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut store = CacheStore::new(100);
        store.set("k", "v1".to_string(), TTL).unwrap();
        store.set("k", "v2".to_string(), TTL).unwrap();

        assert_eq!(store.get("k").as_deref(), Some("v2"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_lru_eviction_at_capacity() {
        let mut store = CacheStore::new(2);
        store.set("k1", "v".to_string(), TTL).unwrap();
        store.set("k2", "v".to_string(), TTL).unwrap();
        store.get("k1");
        store.set("k3", "v".to_string(), TTL).unwrap();

        assert!(store.contains("k1"));
        assert!(!store.contains("k2"));
        assert!(store.contains("k3"));
        assert_eq!(store.stats().evictions, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_miss() {
        let mut store = CacheStore::new(10);
        store.set("k", "v".to_string(), Duration::from_secs(1)).unwrap();
        assert!(store.get("k").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.get("k").is_none());
        assert!(store.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_expired() {
        let mut store = CacheStore::new(10);
        store.set("short", "v".to_string(), Duration::from_secs(1)).unwrap();
        store.set("long", "v".to_string(), Duration::from_secs(60)).unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;
        assert_eq!(store.cleanup_expired(), 1);
        assert!(store.contains("long"));
    }

    #[test]
    fn test_key_validation() {
        let mut store = CacheStore::new(10);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        assert!(matches!(
            store.set(&long_key, "v".to_string(), TTL),
            Err(CacheError::InvalidKey(_))
        ));
        assert!(matches!(
            store.set("", "v".to_string(), TTL),
            Err(CacheError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_value_too_large() {
        let mut store = CacheStore::new(10);
        let large = "x".repeat(MAX_VALUE_SIZE + 1);
        assert!(matches!(
            store.set("k", large, TTL),
            Err(CacheError::ValueTooLarge(_))
        ));
    }
}
