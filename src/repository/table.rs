//! In-memory backing table keyed by record id.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::Record;
use crate::error::{AppError, Result};
use crate::query::{apply_filters, FilterSpec, Paginated, QueryPlan};

// == Memory Table ==
/// Shared row storage. Clones share the same rows.
#[derive(Debug, Clone)]
pub struct MemoryTable<T> {
    rows: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T: Record> MemoryTable<T> {
    pub fn new() -> Self {
        Self {
            rows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Row by id, deleted or not.
    pub async fn find(&self, id: Uuid) -> Option<T> {
        self.rows.read().await.get(&id).cloned()
    }

    /// Runs `plan` over every row under a single read lock.
    pub async fn scan(&self, plan: &QueryPlan<'_, T>) -> Paginated<T> {
        let rows = self.rows.read().await;
        plan.execute(rows.values())
    }

    pub async fn count(&self, filter: &FilterSpec<T>) -> u64 {
        let rows = self.rows.read().await;
        rows.values().filter(|row| filter.matches(row)).count() as u64
    }

    /// Hands the rows matching `filter` to `fold` without cloning them.
    pub async fn aggregate<R>(&self, filter: &FilterSpec<T>, fold: impl FnOnce(Vec<&T>) -> R) -> R {
        let rows = self.rows.read().await;
        fold(apply_filters(rows.values(), filter))
    }

    // == Insert ==
    pub async fn insert(&self, record: T) -> Result<T> {
        let mut rows = self.rows.write().await;
        let id = record.id();
        if rows.contains_key(&id) {
            return Err(AppError::AlreadyExists {
                resource: T::RESOURCE,
                id: id.to_string(),
            });
        }
        rows.insert(id, record.clone());
        Ok(record)
    }

    // == Replace ==
    /// Applies `change` to a working copy of row `id` under the write lock.
    ///
    /// The row is only written back when `change` succeeds, so a rejected
    /// change leaves the stored row untouched.
    pub async fn replace(&self, id: Uuid, change: impl FnOnce(&mut T) -> Result<()>) -> Result<T> {
        let mut rows = self.rows.write().await;
        let current = rows
            .get_mut(&id)
            .ok_or_else(|| AppError::not_found(T::RESOURCE, id))?;

        let mut working = current.clone();
        change(&mut working)?;
        *current = working.clone();
        Ok(working)
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<T: Record> Default for MemoryTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
