//! API Module
//!
//! HTTP handlers and routing for the catalog REST API.
//!
//! # Endpoints
//! - `GET/POST /auctions`, `GET /auctions/count`, `GET /auctions/count/by-status`
//! - `GET/PUT/DELETE /auctions/:id`
//! - `GET/POST /bookmarks`, `DELETE /bookmarks/:id`
//! - `GET/POST /reviews`, `GET /sellers/:seller/rating`
//! - `GET /cache/stats`, `GET /health`

pub mod handlers;
pub mod routes;

pub use handlers::{AppState, CachedStore, PagingLimits, ACTOR_HEADER};
pub use routes::create_router;
