//! Page requests and the paginated result envelope.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Page size used when a request does not carry one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

// == Page Request ==
/// 1-based page number and page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Number of records preceding this page.
    pub fn skip(&self) -> usize {
        self.page.saturating_sub(1) as usize * self.page_size as usize
    }

    /// Checks `page >= 1` and `1 <= page_size <= max_page_size`.
    ///
    /// Query execution assumes this already passed.
    pub fn validate(&self, max_page_size: u32) -> Result<()> {
        if self.page < 1 {
            return Err(AppError::InvalidArgument(
                "page must be at least 1".to_string(),
            ));
        }
        if self.page_size < 1 {
            return Err(AppError::InvalidArgument(
                "pageSize must be at least 1".to_string(),
            ));
        }
        if self.page_size > max_page_size {
            return Err(AppError::InvalidArgument(format!(
                "pageSize must not exceed {}",
                max_page_size
            )));
        }
        Ok(())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

// == Apply Paging ==
/// `skip((page - 1) * page_size).take(page_size)`
pub fn apply_paging<I: IntoIterator>(records: I, page: &PageRequest) -> Vec<I::Item> {
    records
        .into_iter()
        .skip(page.skip())
        .take(page.page_size as usize)
        .collect()
}

// == Paginated ==
/// One page of results plus the count of all matching records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Matching records before paging was applied
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total_count: u64, page: PageRequest) -> Self {
        Self {
            items,
            total_count,
            page: page.page,
            page_size: page.page_size,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_count.div_ceil(self.page_size as u64)
    }

    pub fn has_next(&self) -> bool {
        (self.page as u64) < self.total_pages()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
