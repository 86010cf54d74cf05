//! Auction listings.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{impl_record, AuditStamp};
use crate::error::AppError;

// == Auction Status ==
/// Lifecycle state of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuctionStatus {
    Draft,
    Active,
    Closed,
    Cancelled,
}

impl AuctionStatus {
    pub const ALL: [AuctionStatus; 4] = [
        AuctionStatus::Draft,
        AuctionStatus::Active,
        AuctionStatus::Closed,
        AuctionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AuctionStatus::Draft => "draft",
            AuctionStatus::Active => "active",
            AuctionStatus::Closed => "closed",
            AuctionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AuctionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuctionStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AuctionStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AppError::InvalidArgument(format!("unknown auction status '{}'", s)))
    }
}

// == Auction ==
/// A listing put up for bidding. Prices are in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub seller: String,
    pub category: String,
    pub status: AuctionStatus,
    pub starting_price: i64,
    pub current_price: i64,
    pub ends_at: DateTime<Utc>,
    pub is_deleted: bool,
    pub version: u64,
    pub audit: AuditStamp,
}

impl_record!(Auction, "auction");

impl Auction {
    /// Builds an unsaved listing; the store assigns version and audit fields.
    pub fn draft(
        title: impl Into<String>,
        seller: impl Into<String>,
        category: impl Into<String>,
        starting_price: i64,
        ends_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: String::new(),
            seller: seller.into(),
            category: category.into(),
            status: AuctionStatus::Draft,
            starting_price,
            current_price: starting_price,
            ends_at,
            is_deleted: false,
            version: 0,
            audit: AuditStamp::default(),
        }
    }

    pub fn with_status(mut self, status: AuctionStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Case-insensitive match against title and description.
    pub fn mentions(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!("ACTIVE".parse::<AuctionStatus>().unwrap(), AuctionStatus::Active);
        assert_eq!(" closed ".parse::<AuctionStatus>().unwrap(), AuctionStatus::Closed);
        assert!("sold".parse::<AuctionStatus>().is_err());
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&AuctionStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }

    #[test]
    fn test_draft_defaults() {
        let auction = Auction::draft("Lamp", "alice", "home", 1_500, Utc::now());
        assert_eq!(auction.status, AuctionStatus::Draft);
        assert_eq!(auction.current_price, 1_500);
        assert_eq!(auction.version(), 0);
        assert!(!auction.is_deleted());
    }

    #[test]
    fn test_mentions() {
        let auction = Auction::draft("Vintage Lamp", "alice", "home", 100, Utc::now())
            .with_description("Brass, 1960s");
        assert!(auction.mentions("lamp"));
        assert!(auction.mentions("BRASS"));
        assert!(!auction.mentions("chair"));
    }

    #[test]
    fn test_record_mark_deleted() {
        let mut auction = Auction::draft("Lamp", "alice", "home", 100, Utc::now());
        auction.mark_deleted();
        assert!(auction.is_deleted());
        assert_eq!(Auction::RESOURCE, "auction");
    }
}
