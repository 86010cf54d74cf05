//! Query Module
//!
//! Composes a base predicate, optional filters, a named sort and a page
//! request into a single read over a collection of records. Everything here
//! is pure: no I/O, no shared mutable state.

mod filter;
mod page;
mod plan;
mod sort;


pub use filter::{apply_filters, FilterSpec, Predicate};
pub use page::{apply_paging, PageRequest, Paginated, DEFAULT_PAGE_SIZE};
pub use plan::QueryPlan;
pub use sort::{apply_sorting, Projection, SortDirection, SortMap, SortRequest, SortValue};
