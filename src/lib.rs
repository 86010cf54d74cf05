//! Auction Catalog - cached, filterable record access for an auction platform
//!
//! Composes filters, sorting and paging over soft-deletable records, and
//! wraps data access in a cache-aside layer with TTL expiry and
//! write-driven invalidation.

pub mod api;
pub mod cache;
pub mod cancel;
pub mod config;
pub mod domain;
pub mod error;
pub mod models;
pub mod query;
pub mod repository;
pub mod seed;
pub mod tasks;

pub use api::{create_router, AppState};
pub use config::Config;
pub use tasks::spawn_cleanup_task;
