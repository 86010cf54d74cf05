//! Bookmark list filters and sort fields.

use serde::Deserialize;
use uuid::Uuid;

use super::{folded, matches_folded, ListQuery};
use crate::domain::Bookmark;
use crate::query::{
    FilterSpec, PageRequest, SortDirection, SortMap, SortRequest, SortValue, DEFAULT_PAGE_SIZE,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkQuery {
    pub user: Option<String>,
    pub auction_id: Option<Uuid>,
    pub sort_by: Option<String>,
    pub direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery<Bookmark> for BookmarkQuery {
    fn filter_spec(&self, base: FilterSpec<Bookmark>) -> FilterSpec<Bookmark> {
        base.optional(folded(&self.user), |b: &Bookmark, user: &String| {
            matches_folded(&b.user, user)
        })
        .optional(self.auction_id, |b: &Bookmark, id| b.auction_id == *id)
    }

    fn sort_request(&self) -> SortRequest {
        SortRequest::new(self.sort_by.clone(), self.direction)
    }

    fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
        )
    }

    fn cache_fields(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("user", folded(&self.user)),
            ("auctionId", self.auction_id.map(|id| id.to_string())),
        ]
    }
}

/// Most recently saved first by default.
pub fn bookmark_sort_map() -> SortMap<Bookmark> {
    SortMap::new("createdAt", |b: &Bookmark| SortValue::Time(b.audit.created_at))
        .field("user", |b: &Bookmark| SortValue::text(&b.user))
        .tiebreak(|b: &Bookmark| SortValue::Id(b.id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::apply_filters;

    #[test]
    fn test_user_and_auction_filters() {
        let lamp = Uuid::new_v4();
        let data = vec![
            Bookmark::new("alice", lamp, None),
            Bookmark::new("Alice", Uuid::new_v4(), None),
            Bookmark::new("bob", lamp, None),
        ];

        let by_user = BookmarkQuery {
            user: Some("ALICE".to_string()),
            ..Default::default()
        };
        assert_eq!(apply_filters(&data, &by_user.filter_spec(FilterSpec::all())).len(), 2);

        let both = BookmarkQuery {
            user: Some("alice".to_string()),
            auction_id: Some(lamp),
            ..Default::default()
        };
        let hits = apply_filters(&data, &both.filter_spec(FilterSpec::all()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].auction_id, lamp);
    }
}
