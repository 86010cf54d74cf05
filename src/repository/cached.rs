//! Cache-aside decorator.
//!
//! `CachedRepository` wraps any reader/writer. Single-record and page reads
//! are served from the cache when possible and populated on a miss; every
//! successful write drops the record's key and every list key of the
//! resource. Counts and aggregates pass straight through.
//!
//! Cache failures never fail a request: reads fall through to the inner
//! repository and writes still succeed. Inner failures propagate as-is.
//!
//! Nothing coordinates a read with a concurrent write: a miss whose fetch
//! finishes after a write has invalidated the key stores the pre-write value,
//! which then serves until its TTL lapses. Concurrent misses on one key each
//! reach the inner repository.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, trace, warn};
use uuid::Uuid;

use super::{
    AuctionAggregates, CachePolicy, DataSource, ListQuery, RecordReader, RecordWriter,
    ReviewAggregates,
};
use crate::cache::{entity_key, get_json, list_prefix, set_json, CacheClient, CacheKey, LIST_OP};
use crate::cancel::CancelSignal;
use crate::domain::{Actor, AuctionStatus, Record};
use crate::error::{AppError, Result};
use crate::query::Paginated;

// == Cached Repository ==
pub struct CachedRepository<R, C> {
    inner: Arc<R>,
    cache: Arc<C>,
    policy: CachePolicy,
}

impl<R, C> CachedRepository<R, C>
where
    R: DataSource,
    C: CacheClient,
{
    pub fn new(inner: Arc<R>, cache: Arc<C>, policy: CachePolicy) -> Self {
        Self {
            inner,
            cache,
            policy,
        }
    }

    pub fn inner(&self) -> &Arc<R> {
        &self.inner
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Canonical key for one page of `query`.
    ///
    /// Paging and sort always lead the key; the query contributes its
    /// filter fields.
    pub fn list_key<Q: ListQuery<R::Record>>(query: &Q) -> String {
        let page = query.page_request();
        let sort = query.sort_request();

        CacheKey::new(<R::Record as Record>::RESOURCE, LIST_OP)
            .field("page", page.page)
            .field("pageSize", page.page_size)
            .optional("sortBy", sort.normalized_field())
            .field("direction", sort.direction)
            .fields(query.cache_fields())
            .build()
    }

    // == Invalidation ==
    /// Drops the record key (when given) and every list key of the resource.
    async fn invalidate(&self, id: Option<Uuid>) {
        let resource = <R::Record as Record>::RESOURCE;

        if let Some(id) = id {
            let key = entity_key(resource, id);
            match self.cache.remove(&key).await {
                Ok(()) => debug!(key = %key, "Invalidated cached record"),
                Err(err) => warn!(key = %key, error = %err, "Cache invalidation failed"),
            }
        }

        let prefix = list_prefix(resource);
        match self.cache.remove_prefix(&prefix).await {
            Ok(removed) => debug!(prefix = %prefix, removed, "Invalidated cached lists"),
            Err(err) => warn!(prefix = %prefix, error = %err, "Cache invalidation failed"),
        }
    }
}

/// Runs `fetch` unless `cancel` fires first.
async fn until_cancelled<F, T>(cancel: &CancelSignal, fetch: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(AppError::Cancelled),
        result = fetch => result,
    }
}

impl<R, C> DataSource for CachedRepository<R, C>
where
    R: DataSource,
    C: CacheClient,
{
    type Record = R::Record;
}

// == Reads ==
#[async_trait]
impl<R, C> RecordReader for CachedRepository<R, C>
where
    R: RecordReader,
    C: CacheClient,
{
    async fn find_by_id(&self, id: Uuid, cancel: &CancelSignal) -> Result<Option<R::Record>> {
        cancel.check()?;
        let key = entity_key(<R::Record as Record>::RESOURCE, id);

        if let Some(hit) = get_json::<R::Record, _>(self.cache.as_ref(), &key).await {
            trace!(key = %key, "Cache hit");
            return Ok(Some(hit));
        }
        trace!(key = %key, "Cache miss");

        let fetched = until_cancelled(cancel, self.inner.find_by_id(id, cancel)).await?;
        // Absence is not cached; the caller sees NotFound via get_by_id
        if let Some(record) = &fetched {
            cancel.check()?;
            if set_json(self.cache.as_ref(), &key, record, self.policy.entity_ttl).await {
                debug!(key = %key, "Cached record");
            }
        }
        Ok(fetched)
    }

    async fn get_paged<Q>(&self, query: &Q, cancel: &CancelSignal) -> Result<Paginated<R::Record>>
    where
        Q: ListQuery<R::Record>,
    {
        cancel.check()?;
        let key = Self::list_key(query);

        if let Some(hit) = get_json::<Paginated<R::Record>, _>(self.cache.as_ref(), &key).await {
            trace!(key = %key, "Cache hit");
            return Ok(hit);
        }
        trace!(key = %key, "Cache miss");

        let page = until_cancelled(cancel, self.inner.get_paged(query, cancel)).await?;
        cancel.check()?;
        if set_json(self.cache.as_ref(), &key, &page, self.policy.list_ttl).await {
            debug!(key = %key, items = page.items.len(), "Cached page");
        }
        Ok(page)
    }

    async fn exists(&self, id: Uuid, cancel: &CancelSignal) -> Result<bool> {
        self.inner.exists(id, cancel).await
    }

    async fn count<Q>(&self, query: &Q, cancel: &CancelSignal) -> Result<u64>
    where
        Q: ListQuery<R::Record>,
    {
        self.inner.count(query, cancel).await
    }
}

// == Writes ==
// Cancellation is honoured before delegating. Once the inner write starts,
// it and the invalidation that follows run to completion.
#[async_trait]
impl<R, C> RecordWriter for CachedRepository<R, C>
where
    R: RecordWriter,
    C: CacheClient,
{
    async fn create(
        &self,
        record: R::Record,
        actor: &Actor,
        cancel: &CancelSignal,
    ) -> Result<R::Record> {
        cancel.check()?;
        let created = self
            .inner
            .create(record, actor, &CancelSignal::never())
            .await?;
        self.invalidate(None).await;
        Ok(created)
    }

    async fn update(
        &self,
        record: R::Record,
        expected_version: u64,
        actor: &Actor,
        cancel: &CancelSignal,
    ) -> Result<R::Record> {
        cancel.check()?;
        let updated = self
            .inner
            .update(record, expected_version, actor, &CancelSignal::never())
            .await?;
        self.invalidate(Some(updated.id())).await;
        Ok(updated)
    }

    async fn delete(&self, id: Uuid, actor: &Actor, cancel: &CancelSignal) -> Result<()> {
        cancel.check()?;
        self.inner.delete(id, actor, &CancelSignal::never()).await?;
        self.invalidate(Some(id)).await;
        Ok(())
    }
}

// == Pass-through Aggregates ==
#[async_trait]
impl<R, C> AuctionAggregates for CachedRepository<R, C>
where
    R: AuctionAggregates,
    C: CacheClient,
{
    async fn count_by_status(&self, cancel: &CancelSignal) -> Result<BTreeMap<AuctionStatus, u64>> {
        self.inner.count_by_status(cancel).await
    }
}

#[async_trait]
impl<R, C> ReviewAggregates for CachedRepository<R, C>
where
    R: ReviewAggregates,
    C: CacheClient,
{
    async fn average_rating_for_seller(
        &self,
        seller: &str,
        cancel: &CancelSignal,
    ) -> Result<Option<f64>> {
        self.inner.average_rating_for_seller(seller, cancel).await
    }
}
