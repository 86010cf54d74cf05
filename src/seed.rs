//! Demo data for local runs.

use chrono::{Duration, Utc};
use tracing::info;

use crate::api::AppState;
use crate::cancel::CancelSignal;
use crate::domain::{Actor, Auction, AuctionStatus};
use crate::error::Result;
use crate::repository::RecordWriter;

/// Creates a handful of auctions through the cached repository.
///
/// Returns how many were created.
pub async fn seed_demo_auctions(state: &AppState) -> Result<usize> {
    let now = Utc::now();
    let actor = Actor::new("seed");
    let demo = [
        ("Vintage Brass Lamp", "alice", "home", 4_500, AuctionStatus::Active, 3),
        ("Oak Writing Desk", "alice", "furniture", 22_000, AuctionStatus::Active, 5),
        ("Film Camera, 1978", "bob", "electronics", 9_900, AuctionStatus::Draft, 10),
        ("Signed First Edition", "carol", "books", 15_000, AuctionStatus::Closed, -2),
        ("Mountain Bike", "bob", "sports", 31_000, AuctionStatus::Active, 1),
    ];

    let never = CancelSignal::never();
    for (title, seller, category, price, status, days) in demo {
        let auction = Auction::draft(title, seller, category, price, now + Duration::days(days))
            .with_status(status);
        state.auctions.create(auction, &actor, &never).await?;
    }

    info!(count = demo.len(), "Seeded demo auctions");
    Ok(demo.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::repository::{AuctionQuery, RecordReader};

    #[tokio::test]
    async fn test_seed_creates_live_auctions() {
        let state = AppState::from_config(&Config::default());
        let created = seed_demo_auctions(&state).await.unwrap();

        let count = state
            .auctions
            .count(&AuctionQuery::default(), &CancelSignal::never())
            .await
            .unwrap();
        assert_eq!(count, created as u64);
    }
}
