//! Cache Entry Module
//!
//! A serialized snapshot stored under a key with a fixed time-to-live.

use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// A single cached value and its expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// JSON snapshot of a record or page
    pub value: String,
    /// When the entry stops being served
    pub expires_at: Instant,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: String, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    // == Is Expired ==
    /// An entry is expired once the current time reaches its expiry, so a
    /// zero TTL is never served.
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let entry = CacheEntry::new("{}".to_string(), Duration::from_secs(60));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_secs(59)).await;
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_is_expired_immediately() {
        let entry = CacheEntry::new("value".to_string(), Duration::ZERO);
        assert!(entry.is_expired(), "Entry should be expired at boundary");
    }
}
