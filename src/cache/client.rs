//! Cache client abstraction.
//!
//! `CacheClient` is the seam between repositories and whatever key/value
//! cache backs them. `MemoryCache` is the in-process implementation.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::warn;

use crate::cache::{CacheStats, CacheStore};
use crate::error::CacheError;

// == Cache Client Trait ==
#[async_trait]
pub trait CacheClient: Send + Sync {
    /// Returns the live value stored under `key`, if any.
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError>;

    /// Stores `value` under `key` for `ttl`.
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError>;

    /// Removes `key`. Absent keys are not an error.
    async fn remove(&self, key: &str) -> Result<(), CacheError>;

    /// Removes every key starting with `prefix`.
    async fn remove_prefix(&self, prefix: &str) -> Result<usize, CacheError>;
}

// == Memory Cache ==
/// Thread-safe in-memory cache over a shared `CacheStore`.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<CacheStore>>,
}

impl MemoryCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(max_entries))),
        }
    }

    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    /// Drops expired entries; returns how many were removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.write().await.cleanup_expired()
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.read().await.contains(key)
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        // Write lock: a read updates LRU order and stats
        Ok(self.store.write().await.get(key))
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), CacheError> {
        self.store.write().await.set(key, value, ttl)
    }

    async fn remove(&self, key: &str) -> Result<(), CacheError> {
        self.store.write().await.remove(key);
        Ok(())
    }

    async fn remove_prefix(&self, prefix: &str) -> Result<usize, CacheError> {
        Ok(self.store.write().await.remove_prefix(prefix))
    }
}

// == Typed Helpers ==
/// Reads and decodes a JSON value.
///
/// Client failures and undecodable values are logged and reported as a miss.
pub async fn get_json<T, C>(cache: &C, key: &str) -> Option<T>
where
    T: DeserializeOwned,
    C: CacheClient + ?Sized,
{
    match cache.get(key).await {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(key = %key, error = %err, "Cached value failed to decode, treating as miss");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            warn!(key = %key, error = %err, "Cache read failed, skipping cache");
            None
        }
    }
}

/// Encodes and stores a JSON value. Failures are logged, never returned.
pub async fn set_json<T, C>(cache: &C, key: &str, value: &T, ttl: Duration) -> bool
where
    T: Serialize + Sync + ?Sized,
    C: CacheClient + ?Sized,
{
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(key = %key, error = %err, "Failed to encode value for cache");
            return false;
        }
    };

    match cache.set(key, raw, ttl).await {
        Ok(()) => true,
        Err(err) => {
            warn!(key = %key, error = %err, "Cache write failed, skipping cache");
            false
        }
    }
}
