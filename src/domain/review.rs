//! Buyer reviews of a seller, tied to the auction they won.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{impl_record, AuditStamp};

/// Lowest and highest star rating accepted.
pub const RATING_RANGE: std::ops::RangeInclusive<u8> = 1..=5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: Uuid,
    pub auction_id: Uuid,
    pub reviewer: String,
    pub seller: String,
    pub rating: u8,
    pub comment: String,
    pub is_deleted: bool,
    pub version: u64,
    pub audit: AuditStamp,
}

impl_record!(Review, "review");

impl Review {
    pub fn new(
        auction_id: Uuid,
        reviewer: impl Into<String>,
        seller: impl Into<String>,
        rating: u8,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            auction_id,
            reviewer: reviewer.into(),
            seller: seller.into(),
            rating,
            comment: comment.into(),
            is_deleted: false,
            version: 0,
            audit: AuditStamp::default(),
        }
    }

    pub fn has_valid_rating(&self) -> bool {
        RATING_RANGE.contains(&self.rating)
    }
}
