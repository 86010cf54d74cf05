//! Plain data access over a `MemoryTable`.
//!
//! Every read runs through the soft-delete base filter. Writes stamp audit
//! fields from the injected clock and bump the row version.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use super::{DataSource, ListQuery, MemoryTable, RecordReader, RecordWriter};
use crate::cancel::CancelSignal;
use crate::domain::{Actor, AuditStamp, Record, SharedClock};
use crate::error::{AppError, Result};
use crate::query::{FilterSpec, Paginated, QueryPlan, SortMap};

// == Store Repository ==
pub struct StoreRepository<T> {
    table: MemoryTable<T>,
    sort_map: Arc<SortMap<T>>,
    clock: SharedClock,
}

impl<T: Record> StoreRepository<T> {
    pub fn new(table: MemoryTable<T>, sort_map: Arc<SortMap<T>>, clock: SharedClock) -> Self {
        Self {
            table,
            sort_map,
            clock,
        }
    }

    /// Base predicate for every default read path.
    pub fn live() -> FilterSpec<T> {
        FilterSpec::new(|record: &T| !record.is_deleted())
    }

    pub fn table(&self) -> &MemoryTable<T> {
        &self.table
    }
}

impl<T: Record> DataSource for StoreRepository<T> {
    type Record = T;
}

#[async_trait]
impl<T: Record> RecordReader for StoreRepository<T> {
    async fn find_by_id(&self, id: Uuid, cancel: &CancelSignal) -> Result<Option<T>> {
        cancel.check()?;
        Ok(self.table.find(id).await.filter(|record| !record.is_deleted()))
    }

    async fn get_paged<Q>(&self, query: &Q, cancel: &CancelSignal) -> Result<Paginated<T>>
    where
        Q: ListQuery<T>,
    {
        cancel.check()?;
        let plan = QueryPlan::new(query.filter_spec(Self::live()), &self.sort_map)
            .sorted(query.sort_request())
            .paged(query.page_request());

        let page = self.table.scan(&plan).await;
        debug!(
            resource = T::RESOURCE,
            filters = plan.filter().active_filters(),
            total = page.total_count,
            returned = page.items.len(),
            "Executed list query"
        );
        Ok(page)
    }

    async fn exists(&self, id: Uuid, cancel: &CancelSignal) -> Result<bool> {
        Ok(self.find_by_id(id, cancel).await?.is_some())
    }

    async fn count<Q>(&self, query: &Q, cancel: &CancelSignal) -> Result<u64>
    where
        Q: ListQuery<T>,
    {
        cancel.check()?;
        Ok(self.table.count(&query.filter_spec(Self::live())).await)
    }
}

#[async_trait]
impl<T: Record> RecordWriter for StoreRepository<T> {
    async fn create(&self, mut record: T, actor: &Actor, cancel: &CancelSignal) -> Result<T> {
        cancel.check()?;
        if record.is_deleted() {
            return Err(AppError::InvalidArgument(format!(
                "cannot create a deleted {}",
                T::RESOURCE
            )));
        }

        *record.audit_mut() = AuditStamp::new(self.clock.now(), actor);
        record.set_version(1);

        let created = self.table.insert(record).await?;
        debug!(resource = T::RESOURCE, id = %created.id(), actor = %actor, "Created record");
        Ok(created)
    }

    async fn update(
        &self,
        record: T,
        expected_version: u64,
        actor: &Actor,
        cancel: &CancelSignal,
    ) -> Result<T> {
        cancel.check()?;
        if record.is_deleted() {
            return Err(AppError::InvalidArgument(
                "use delete to remove a record".to_string(),
            ));
        }

        let id = record.id();
        let now = self.clock.now();
        let updated = self
            .table
            .replace(id, move |current| {
                if current.is_deleted() {
                    return Err(AppError::not_found(T::RESOURCE, id));
                }
                if current.version() != expected_version {
                    return Err(AppError::Conflict {
                        resource: T::RESOURCE,
                        id: id.to_string(),
                        expected: expected_version,
                        actual: current.version(),
                    });
                }

                let created = current.audit().clone();
                let next_version = current.version() + 1;
                *current = record;
                *current.audit_mut() = created;
                current.audit_mut().touch(now, actor);
                current.set_version(next_version);
                Ok(())
            })
            .await?;

        debug!(resource = T::RESOURCE, id = %id, version = updated.version(), "Updated record");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid, actor: &Actor, cancel: &CancelSignal) -> Result<()> {
        cancel.check()?;
        let now = self.clock.now();
        self.table
            .replace(id, |current| {
                if current.is_deleted() {
                    return Err(AppError::not_found(T::RESOURCE, id));
                }
                current.mark_deleted();
                current.audit_mut().touch(now, actor);
                current.set_version(current.version() + 1);
                Ok(())
            })
            .await?;

        debug!(resource = T::RESOURCE, id = %id, actor = %actor, "Soft-deleted record");
        Ok(())
    }
}
