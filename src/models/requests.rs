//! Request DTOs for the catalog API
//!
//! Defines the structure of incoming HTTP request bodies.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::domain::{Auction, AuctionStatus, RATING_RANGE};

/// Longest accepted auction title, in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Request body for POST /auctions
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuctionRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub seller: String,
    pub category: String,
    /// Opening price in cents
    pub starting_price: i64,
    pub ends_at: DateTime<Utc>,
    /// Defaults to draft
    #[serde(default)]
    pub status: Option<AuctionStatus>,
}

impl CreateAuctionRequest {
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = validate_title(&self.title) {
            return Some(msg);
        }
        if self.seller.trim().is_empty() {
            return Some("Seller cannot be empty".to_string());
        }
        if self.category.trim().is_empty() {
            return Some("Category cannot be empty".to_string());
        }
        if self.starting_price < 0 {
            return Some("Starting price cannot be negative".to_string());
        }
        None
    }

    pub fn into_auction(self) -> Auction {
        Auction::draft(
            self.title.trim(),
            self.seller.trim(),
            self.category.trim(),
            self.starting_price,
            self.ends_at,
        )
        .with_description(self.description)
        .with_status(self.status.unwrap_or(AuctionStatus::Draft))
    }
}

/// Request body for PUT /auctions/:id
///
/// Absent fields keep their stored value. `version` must match the stored
/// row version.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAuctionRequest {
    pub version: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<AuctionStatus>,
    #[serde(default)]
    pub current_price: Option<i64>,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl UpdateAuctionRequest {
    pub fn validate(&self) -> Option<String> {
        if let Some(msg) = self.title.as_deref().and_then(validate_title) {
            return Some(msg);
        }
        if self.category.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Some("Category cannot be empty".to_string());
        }
        if self.current_price.is_some_and(|p| p < 0) {
            return Some("Current price cannot be negative".to_string());
        }
        None
    }

    pub fn apply(self, auction: &mut Auction) {
        if let Some(title) = self.title {
            auction.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            auction.description = description;
        }
        if let Some(category) = self.category {
            auction.category = category.trim().to_string();
        }
        if let Some(status) = self.status {
            auction.status = status;
        }
        if let Some(price) = self.current_price {
            auction.current_price = price;
        }
        if let Some(ends_at) = self.ends_at {
            auction.ends_at = ends_at;
        }
    }
}

/// Request body for POST /bookmarks. The bookmark owner is the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    pub auction_id: Uuid,
    #[serde(default)]
    pub note: Option<String>,
}

impl CreateBookmarkRequest {
    pub fn validate(&self) -> Option<String> {
        if self.note.as_deref().is_some_and(|n| n.len() > 500) {
            return Some("Note exceeds maximum length of 500 characters".to_string());
        }
        None
    }
}

/// Request body for POST /reviews. The reviewer is the caller and the
/// seller is taken from the auction.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    pub auction_id: Uuid,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

impl CreateReviewRequest {
    pub fn validate(&self) -> Option<String> {
        if !RATING_RANGE.contains(&self.rating) {
            return Some(format!(
                "Rating must be between {} and {}",
                RATING_RANGE.start(),
                RATING_RANGE.end()
            ));
        }
        None
    }
}

fn validate_title(title: &str) -> Option<String> {
    let title = title.trim();
    if title.is_empty() {
        return Some("Title cannot be empty".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Some(format!(
            "Title exceeds maximum length of {} characters",
            MAX_TITLE_LENGTH
        ));
    }
    None
}
