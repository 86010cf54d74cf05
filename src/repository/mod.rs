//! Repository Module
//!
//! Data access split into small capabilities: a reader, a writer and the
//! per-resource aggregate traits. `StoreRepository` implements them over a
//! `MemoryTable`; `CachedRepository` decorates any implementation with
//! cache-aside reads and invalidating writes.

mod auction;
mod bookmark;
mod cached;
mod review;
mod store;
mod table;

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::cancel::CancelSignal;
use crate::domain::{Actor, Record};
use crate::error::{AppError, Result};
use crate::query::{FilterSpec, PageRequest, Paginated, SortRequest};

pub use auction::{auction_sort_map, AuctionAggregates, AuctionQuery};
pub use bookmark::{bookmark_sort_map, BookmarkQuery};
pub use cached::CachedRepository;
pub use review::{review_sort_map, ReviewAggregates, ReviewQuery};
pub use store::StoreRepository;
pub use table::MemoryTable;

// == Cache Policy ==
/// Time-to-live per resource class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// Single-record reads
    pub entity_ttl: Duration,
    /// List/page reads; shorter because any write to the resource stales them
    pub list_ttl: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            entity_ttl: Duration::from_secs(600),
            list_ttl: Duration::from_secs(60),
        }
    }
}

// == List Query ==
/// Per-resource list parameters.
pub trait ListQuery<T>: Send + Sync {
    /// Adds this query's optional predicates on top of `base`.
    fn filter_spec(&self, base: FilterSpec<T>) -> FilterSpec<T>;

    fn sort_request(&self) -> SortRequest;

    fn page_request(&self) -> PageRequest;

    /// Every filter field that can change the result set, in a fixed order.
    ///
    /// Values must be normalized the same way `filter_spec` reads them.
    /// Paging and sorting are added to the key separately.
    fn cache_fields(&self) -> Vec<(&'static str, Option<String>)>;
}

// == Capability Traits ==
/// Anything that serves records of one type.
pub trait DataSource: Send + Sync {
    type Record: Record;
}

#[async_trait]
pub trait RecordReader: DataSource {
    /// Live record by id; `None` when absent or soft-deleted.
    async fn find_by_id(&self, id: Uuid, cancel: &CancelSignal) -> Result<Option<Self::Record>>;

    /// Like `find_by_id` but absence is a `NotFound`.
    async fn get_by_id(&self, id: Uuid, cancel: &CancelSignal) -> Result<Self::Record> {
        self.find_by_id(id, cancel)
            .await?
            .ok_or_else(|| AppError::not_found(<Self::Record as Record>::RESOURCE, id))
    }

    async fn get_paged<Q>(&self, query: &Q, cancel: &CancelSignal) -> Result<Paginated<Self::Record>>
    where
        Q: ListQuery<Self::Record>;

    async fn exists(&self, id: Uuid, cancel: &CancelSignal) -> Result<bool>;

    /// Matching live records, ignoring paging.
    async fn count<Q>(&self, query: &Q, cancel: &CancelSignal) -> Result<u64>
    where
        Q: ListQuery<Self::Record>;
}

#[async_trait]
pub trait RecordWriter: DataSource {
    /// Stores a new record stamped with `actor` at version 1.
    async fn create(
        &self,
        record: Self::Record,
        actor: &Actor,
        cancel: &CancelSignal,
    ) -> Result<Self::Record>;

    /// Replaces a live record if its stored version equals `expected_version`.
    async fn update(
        &self,
        record: Self::Record,
        expected_version: u64,
        actor: &Actor,
        cancel: &CancelSignal,
    ) -> Result<Self::Record>;

    /// Soft-deletes a live record.
    async fn delete(&self, id: Uuid, actor: &Actor, cancel: &CancelSignal) -> Result<()>;
}

/// Trimmed text filter value; blank input counts as unset.
pub(crate) fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Case-folded text filter value. Filters and cache keys both read this, so
/// two values share a key only when they match the same rows.
pub(crate) fn folded(value: &Option<String>) -> Option<String> {
    non_blank(value).map(|v| v.to_lowercase())
}

/// Exact match ignoring case, against a value from `folded`.
pub(crate) fn matches_folded(field: &str, folded: &str) -> bool {
    field.to_lowercase() == folded
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(&Some("  alice ".to_string())), Some("alice".to_string()));
        assert_eq!(non_blank(&Some("   ".to_string())), None);
        assert_eq!(non_blank(&None), None);
    }

    #[test]
    fn test_folded_matches_what_it_keys() {
        let upper = folded(&Some(" Ärger ".to_string())).unwrap();
        let lower = folded(&Some("ärger".to_string())).unwrap();
        assert_eq!(upper, lower);
        assert!(matches_folded("ÄRGER", &upper));
        assert!(matches_folded("ärger", &lower));
        assert!(!matches_folded("arger", &lower));
        assert_eq!(folded(&Some("  ".to_string())), None);
    }

    #[test]
    fn test_default_policy_lists_expire_first() {
        let policy = CachePolicy::default();
        assert!(policy.list_ttl < policy.entity_ttl);
    }
}
