//! Error types for the auction catalog
//!
//! Provides unified error handling using thiserror. `CacheError` stays inside
//! the cache client; `AppError` is what data access and the HTTP layer surface.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by a cache client.
///
/// The repository layer never propagates these: a failing cache is logged
/// and skipped so reads fall through to the backing store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key is empty or exceeds the maximum length
    #[error("Invalid cache key: {0}")]
    InvalidKey(String),

    /// Serialized value exceeds the maximum size
    #[error("Value too large: {0} bytes")]
    ValueTooLarge(usize),

    /// Cache is full and eviction failed
    #[error("Cache full: {0}")]
    Full(String),

    /// Cache backend cannot be reached
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}

// == App Error Enum ==
/// Unified error type for data access and the API boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// No matching, non-deleted record
    #[error("{resource} not found: {id}")]
    NotFound { resource: &'static str, id: String },

    /// Record with the same identifier already exists
    #[error("{resource} already exists: {id}")]
    AlreadyExists { resource: &'static str, id: String },

    /// Caller supplied an invalid page request or payload
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Optimistic concurrency check failed on update
    #[error("{resource} {id} was modified concurrently (expected version {expected}, found {actual})")]
    Conflict {
        resource: &'static str,
        id: String,
        expected: u64,
        actual: u64,
    },

    /// Backing store cannot be reached
    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    /// Caller cancelled the operation before it completed
    #[error("Operation cancelled")]
    Cancelled,

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for a `NotFound` on a resource identifier.
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        AppError::NotFound {
            resource,
            id: id.to_string(),
        }
    }

    /// HTTP status this error maps to at the API boundary.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyExists { .. } | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            AppError::DependencyUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for data access and handlers.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn test_not_found_display() {
        let err = AppError::not_found("auction", "abc-123");
        assert_eq!(err.to_string(), "auction not found: abc-123");
    }

    #[test]
    fn test_conflict_display() {
        let err = AppError::Conflict {
            resource: "auction",
            id: "abc".to_string(),
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("expected version 2, found 3"));
    }

    #[test]
    fn test_error_status_codes() {
        let cases = vec![
            (AppError::not_found("auction", "x"), StatusCode::NOT_FOUND),
            (
                AppError::InvalidArgument("page".to_string()),
                StatusCode::BAD_REQUEST,
            ),
            (
                AppError::AlreadyExists {
                    resource: "review",
                    id: "x".to_string(),
                },
                StatusCode::CONFLICT,
            ),
            (
                AppError::DependencyUnavailable("store".to_string()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (AppError::Cancelled, StatusCode::REQUEST_TIMEOUT),
            (
                AppError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_error_body_is_json() {
        let response = AppError::InvalidArgument("page must be >= 1".to_string()).into_response();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(json["error"], "Invalid argument: page must be >= 1");
    }
}
