//! Response DTOs for the catalog API
//!
//! Records and page envelopes serialize themselves; these cover the rest.

use serde::Serialize;

use crate::cache::CacheStats;

/// Response body for DELETE endpoints
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: String,
}

impl DeleteResponse {
    pub fn new(resource: &str, id: impl ToString) -> Self {
        let id = id.to_string();
        Self {
            message: format!("{} '{}' deleted successfully", resource, id),
            id,
        }
    }
}

/// Response body for count endpoints
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CountResponse {
    pub count: u64,
}

/// Response body for GET /sellers/:seller/rating
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub seller: String,
    /// `null` when the seller has no reviews
    pub average_rating: Option<f64>,
}

/// Response body for the stats endpoint (GET /cache/stats)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub invalidations: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl From<CacheStats> for StatsResponse {
    fn from(stats: CacheStats) -> Self {
        Self {
            hits: stats.hits,
            misses: stats.misses,
            evictions: stats.evictions,
            invalidations: stats.invalidations,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
