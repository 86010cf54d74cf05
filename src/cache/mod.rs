//! Cache Module
//!
//! Key/value caching with TTL expiration and LRU eviction, the `CacheClient`
//! seam repositories depend on, and canonical key construction.

mod client;
mod entry;
mod keys;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use client::{get_json, set_json, CacheClient, MemoryCache};
pub(crate) use entry::CacheEntry;
pub use keys::{entity_key, list_prefix, CacheKey, ENTITY_OP, LIST_OP};
pub(crate) use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 512;

/// Maximum allowed value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB
