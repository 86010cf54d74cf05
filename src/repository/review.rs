//! Review list filters, sort fields and seller rating aggregate.

use async_trait::async_trait;
use serde::Deserialize;
use uuid::Uuid;

use super::{folded, matches_folded, ListQuery, StoreRepository};
use crate::cancel::CancelSignal;
use crate::domain::Review;
use crate::error::Result;
use crate::query::{
    FilterSpec, PageRequest, SortDirection, SortMap, SortRequest, SortValue, DEFAULT_PAGE_SIZE,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewQuery {
    pub auction_id: Option<Uuid>,
    pub seller: Option<String>,
    pub reviewer: Option<String>,
    pub min_rating: Option<u8>,
    pub sort_by: Option<String>,
    pub direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery<Review> for ReviewQuery {
    fn filter_spec(&self, base: FilterSpec<Review>) -> FilterSpec<Review> {
        base.optional(self.auction_id, |r: &Review, id| r.auction_id == *id)
            .optional(folded(&self.seller), |r: &Review, seller: &String| {
                matches_folded(&r.seller, seller)
            })
            .optional(folded(&self.reviewer), |r: &Review, reviewer: &String| {
                matches_folded(&r.reviewer, reviewer)
            })
            .optional(self.min_rating, |r: &Review, min| r.rating >= *min)
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
            ("auctionId", self.auction_id.map(|id| id.to_string())),
            ("seller", folded(&self.seller)),
            ("reviewer", folded(&self.reviewer)),
            ("minRating", self.min_rating.map(|r| r.to_string())),
        ]
    }
}

pub fn review_sort_map() -> SortMap<Review> {
    SortMap::new("createdAt", |r: &Review| SortValue::Time(r.audit.created_at))
        .field("rating", |r: &Review| SortValue::Int(r.rating as i64))
        .field("reviewer", |r: &Review| SortValue::text(&r.reviewer))
        .tiebreak(|r: &Review| SortValue::Id(r.id))
}

// == Aggregates ==
#[async_trait]
pub trait ReviewAggregates: Send + Sync {
    /// Mean rating across a seller's live reviews; `None` when there are none.
    async fn average_rating_for_seller(&self, seller: &str, cancel: &CancelSignal)
        -> Result<Option<f64>>;
}

#[async_trait]
impl ReviewAggregates for StoreRepository<Review> {
    async fn average_rating_for_seller(
        &self,
        seller: &str,
        cancel: &CancelSignal,
    ) -> Result<Option<f64>> {
        cancel.check()?;
        let filter = ReviewQuery {
            seller: Some(seller.to_string()),
            ..Default::default()
        }
        .filter_spec(Self::live());

        let average = self
            .table()
            .aggregate(&filter, |rows| {
                if rows.is_empty() {
                    return None;
                }
                let total: u64 = rows.iter().map(|r| r.rating as u64).sum();
                Some(total as f64 / rows.len() as f64)
            })
            .await;
        Ok(average)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::domain::{Actor, SystemClock};
    use crate::repository::{MemoryTable, RecordWriter};

    fn repo() -> StoreRepository<Review> {
        StoreRepository::new(
            MemoryTable::new(),
            Arc::new(review_sort_map()),
            Arc::new(SystemClock),
        )
    }

    #[tokio::test]
    async fn test_average_rating_ignores_deleted_and_other_sellers() {
        let repo = repo();
        let never = CancelSignal::never();
        let actor = Actor::new("bob");
        let auction_id = Uuid::new_v4();

        for (seller, rating) in [("alice", 5), ("alice", 4), ("carol", 1)] {
            repo.create(Review::new(auction_id, "bob", seller, rating, ""), &actor, &never)
                .await
                .unwrap();
        }
        let gone = repo
            .create(Review::new(auction_id, "bob", "alice", 1, ""), &actor, &never)
            .await
            .unwrap();
        repo.delete(gone.id, &actor, &never).await.unwrap();

        let average = repo.average_rating_for_seller("ALICE", &never).await.unwrap();
        assert_eq!(average, Some(4.5));
    }

    #[tokio::test]
    async fn test_average_rating_without_reviews() {
        let average = repo()
            .average_rating_for_seller("nobody", &CancelSignal::never())
            .await
            .unwrap();
        assert_eq!(average, None);
    }

    #[test]
    fn test_min_rating_filter() {
        let auction_id = Uuid::new_v4();
        let data = vec![
            Review::new(auction_id, "a", "s", 2, ""),
            Review::new(auction_id, "b", "s", 4, ""),
        ];
        let query = ReviewQuery {
            min_rating: Some(3),
            ..Default::default()
        };
        let hits = crate::query::apply_filters(&data, &query.filter_spec(FilterSpec::all()));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].reviewer, "b");
    }
}
