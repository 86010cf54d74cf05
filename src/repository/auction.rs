//! Auction list filters, sort fields and aggregates.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

use super::{folded, matches_folded, ListQuery, StoreRepository};
use crate::cancel::CancelSignal;
use crate::domain::{Auction, AuctionStatus};
use crate::error::Result;
use crate::query::{
    FilterSpec, PageRequest, SortDirection, SortMap, SortRequest, SortValue, DEFAULT_PAGE_SIZE,
};

// == Auction Query ==
/// List parameters for auctions, as read from a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuctionQuery {
    pub status: Option<AuctionStatus>,
    pub seller: Option<String>,
    pub category: Option<String>,
    /// Inclusive lower bound on the current price, in cents
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    /// Case-insensitive substring of title or description
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListQuery<Auction> for AuctionQuery {
    fn filter_spec(&self, base: FilterSpec<Auction>) -> FilterSpec<Auction> {
        base.optional(self.status, |a: &Auction, status| a.status == *status)
            .optional(folded(&self.seller), |a: &Auction, seller: &String| {
                matches_folded(&a.seller, seller)
            })
            .optional(folded(&self.category), |a: &Auction, category: &String| {
                matches_folded(&a.category, category)
            })
            .optional(self.min_price, |a: &Auction, min| a.current_price >= *min)
            .optional(self.max_price, |a: &Auction, max| a.current_price <= *max)
            .optional(folded(&self.search), |a: &Auction, needle: &String| {
                a.mentions(needle)
            })
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
            ("status", self.status.map(|s| s.to_string())),
            ("seller", folded(&self.seller)),
            ("category", folded(&self.category)),
            ("minPrice", self.min_price.map(|p| p.to_string())),
            ("maxPrice", self.max_price.map(|p| p.to_string())),
            ("search", folded(&self.search)),
        ]
    }
}

/// Sort fields accepted for auction lists. Newest first by default.
pub fn auction_sort_map() -> SortMap<Auction> {
    SortMap::new("createdAt", |a: &Auction| SortValue::Time(a.audit.created_at))
        .field("updatedAt", |a: &Auction| SortValue::Time(a.audit.updated_at))
        .field("title", |a: &Auction| SortValue::text(&a.title))
        .field("price", |a: &Auction| SortValue::Int(a.current_price))
        .field("currentPrice", |a: &Auction| SortValue::Int(a.current_price))
        .field("startingPrice", |a: &Auction| SortValue::Int(a.starting_price))
        .field("endsAt", |a: &Auction| SortValue::Time(a.ends_at))
        .tiebreak(|a: &Auction| SortValue::Id(a.id))
}

// == Aggregates ==
#[async_trait]
pub trait AuctionAggregates: Send + Sync {
    /// Live auctions per status; every status is present, possibly at zero.
    async fn count_by_status(&self, cancel: &CancelSignal) -> Result<BTreeMap<AuctionStatus, u64>>;
}

#[async_trait]
impl AuctionAggregates for StoreRepository<Auction> {
    async fn count_by_status(&self, cancel: &CancelSignal) -> Result<BTreeMap<AuctionStatus, u64>> {
        cancel.check()?;
        let counts = self
            .table()
            .aggregate(&Self::live(), |rows| {
                let mut counts: BTreeMap<AuctionStatus, u64> =
                    AuctionStatus::ALL.into_iter().map(|s| (s, 0)).collect();
                for auction in rows {
                    *counts.entry(auction.status).or_default() += 1;
                }
                counts
            })
            .await;
        Ok(counts)
    }
}
