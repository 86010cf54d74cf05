//! Auctions a user is watching.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{impl_record, AuditStamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    pub id: Uuid,
    pub user: String,
    pub auction_id: Uuid,
    pub note: Option<String>,
    pub is_deleted: bool,
    pub version: u64,
    pub audit: AuditStamp,
}

impl_record!(Bookmark, "bookmark");

impl Bookmark {
    pub fn new(user: impl Into<String>, auction_id: Uuid, note: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user: user.into(),
            auction_id,
            note,
            is_deleted: false,
            version: 0,
            audit: AuditStamp::default(),
        }
    }
}
