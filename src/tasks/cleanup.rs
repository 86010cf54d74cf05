//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.
//! Expired entries are already misses on read; the sweep only reclaims
//! their memory and keeps the entry count honest.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a background task that sweeps `cache` every `interval`.
///
/// Returns the task handle so shutdown can abort it.
pub fn spawn_cleanup_task(cache: Arc<MemoryCache>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_secs = interval.as_secs(), "Starting TTL cleanup task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.cleanup_expired().await;
            if removed > 0 {
                info!(removed, "TTL cleanup: removed expired entries");
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
