//! API Handlers
//!
//! HTTP request handlers for the catalog endpoints. Handlers validate input,
//! resolve the acting identity and delegate to the cached repositories.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;
use uuid::Uuid;

use crate::cache::MemoryCache;
use crate::cancel::CancelSignal;
use crate::config::Config;
use crate::domain::{Actor, Auction, AuctionStatus, Bookmark, Review, SharedClock, SystemClock};
use crate::error::{AppError, Result};
use crate::models::{
    CountResponse, CreateAuctionRequest, CreateBookmarkRequest, CreateReviewRequest,
    DeleteResponse, HealthResponse, RatingResponse, StatsResponse, UpdateAuctionRequest,
};
use crate::query::{PageRequest, Paginated};
use crate::repository::{
    auction_sort_map, bookmark_sort_map, review_sort_map, AuctionAggregates, AuctionQuery,
    BookmarkQuery, CachedRepository, MemoryTable, RecordReader, RecordWriter, ReviewAggregates,
    ReviewQuery, StoreRepository,
};

/// Header carrying the acting identity for writes.
pub const ACTOR_HEADER: &str = "x-actor";

/// Store-backed repository behind the shared cache.
pub type CachedStore<T> = CachedRepository<StoreRepository<T>, MemoryCache>;

// == Paging Limits ==
/// Upstream page request validation.
#[derive(Debug, Clone, Copy)]
pub struct PagingLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl PagingLimits {
    /// Fills in defaults and rejects out-of-range values.
    pub fn resolve(&self, page: &mut Option<u32>, page_size: &mut Option<u32>) -> Result<()> {
        let resolved = PageRequest::new(
            *page.get_or_insert(1),
            *page_size.get_or_insert(self.default_page_size),
        );
        resolved.validate(self.max_page_size)
    }
}

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub auctions: Arc<CachedStore<Auction>>,
    pub bookmarks: Arc<CachedStore<Bookmark>>,
    pub reviews: Arc<CachedStore<Review>>,
    /// Shared by all three repositories
    pub cache: Arc<MemoryCache>,
    pub paging: PagingLimits,
}

impl AppState {
    /// Wires tables, sort maps and the shared cache from `config`.
    pub fn new(config: &Config, clock: SharedClock) -> Self {
        let cache = Arc::new(MemoryCache::new(config.cache_max_entries));
        let policy = config.cache_policy();

        let auctions = StoreRepository::new(
            MemoryTable::new(),
            Arc::new(auction_sort_map()),
            Arc::clone(&clock),
        );
        let bookmarks = StoreRepository::new(
            MemoryTable::new(),
            Arc::new(bookmark_sort_map()),
            Arc::clone(&clock),
        );
        let reviews = StoreRepository::new(MemoryTable::new(), Arc::new(review_sort_map()), clock);

        Self {
            auctions: Arc::new(CachedRepository::new(
                Arc::new(auctions),
                Arc::clone(&cache),
                policy,
            )),
            bookmarks: Arc::new(CachedRepository::new(
                Arc::new(bookmarks),
                Arc::clone(&cache),
                policy,
            )),
            reviews: Arc::new(CachedRepository::new(
                Arc::new(reviews),
                Arc::clone(&cache),
                policy,
            )),
            cache,
            paging: PagingLimits {
                default_page_size: config.default_page_size,
                max_page_size: config.max_page_size,
            },
        }
    }

    /// Creates a new AppState from configuration using the wall clock.
    pub fn from_config(config: &Config) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }
}

/// Acting identity from the `x-actor` header, or anonymous.
fn actor_from(headers: &HeaderMap) -> Actor {
    headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(Actor::new)
        .unwrap_or_else(Actor::anonymous)
}

fn invalid(message: Option<String>) -> Result<()> {
    match message {
        Some(msg) => Err(AppError::InvalidArgument(msg)),
        None => Ok(()),
    }
}

// == Auctions ==
/// Handler for GET /auctions
pub async fn list_auctions(
    State(state): State<AppState>,
    Query(mut query): Query<AuctionQuery>,
) -> Result<Json<Paginated<Auction>>> {
    state.paging.resolve(&mut query.page, &mut query.page_size)?;
    let page = state.auctions.get_paged(&query, &CancelSignal::never()).await?;
    Ok(Json(page))
}

/// Handler for GET /auctions/count
///
/// Paging parameters are accepted and ignored.
pub async fn count_auctions(
    State(state): State<AppState>,
    Query(query): Query<AuctionQuery>,
) -> Result<Json<CountResponse>> {
    let count = state.auctions.count(&query, &CancelSignal::never()).await?;
    Ok(Json(CountResponse { count }))
}

/// Handler for GET /auctions/count/by-status
pub async fn count_auctions_by_status(
    State(state): State<AppState>,
) -> Result<Json<BTreeMap<AuctionStatus, u64>>> {
    let counts = state.auctions.count_by_status(&CancelSignal::never()).await?;
    Ok(Json(counts))
}

/// Handler for GET /auctions/:id
pub async fn get_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Auction>> {
    let auction = state.auctions.get_by_id(id, &CancelSignal::never()).await?;
    Ok(Json(auction))
}

/// Handler for POST /auctions
pub async fn create_auction(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateAuctionRequest>,
) -> Result<(StatusCode, Json<Auction>)> {
    invalid(req.validate())?;
    let actor = actor_from(&headers);

    let created = state
        .auctions
        .create(req.into_auction(), &actor, &CancelSignal::never())
        .await?;
    info!(auction_id = %created.id, actor = %actor, "Auction created");

    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for PUT /auctions/:id
///
/// The body's `version` must match the stored row; otherwise 409.
pub async fn update_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateAuctionRequest>,
) -> Result<Json<Auction>> {
    invalid(req.validate())?;
    let actor = actor_from(&headers);
    let cancel = CancelSignal::never();

    // Read-modify-write starts from the store, never from a cached copy
    let mut auction = state.auctions.inner().get_by_id(id, &cancel).await?;
    let expected_version = req.version;
    req.apply(&mut auction);

    let updated = state
        .auctions
        .update(auction, expected_version, &actor, &cancel)
        .await?;
    info!(auction_id = %id, version = updated.version, actor = %actor, "Auction updated");

    Ok(Json(updated))
}

/// Handler for DELETE /auctions/:id
pub async fn delete_auction(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>> {
    let actor = actor_from(&headers);
    state
        .auctions
        .delete(id, &actor, &CancelSignal::never())
        .await?;
    info!(auction_id = %id, actor = %actor, "Auction deleted");

    Ok(Json(DeleteResponse::new("auction", id)))
}

// == Bookmarks ==
/// Handler for GET /bookmarks
pub async fn list_bookmarks(
    State(state): State<AppState>,
    Query(mut query): Query<BookmarkQuery>,
) -> Result<Json<Paginated<Bookmark>>> {
    state.paging.resolve(&mut query.page, &mut query.page_size)?;
    let page = state.bookmarks.get_paged(&query, &CancelSignal::never()).await?;
    Ok(Json(page))
}

/// Handler for POST /bookmarks
pub async fn create_bookmark(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>)> {
    invalid(req.validate())?;
    let actor = actor_from(&headers);
    let cancel = CancelSignal::never();

    if !state.auctions.exists(req.auction_id, &cancel).await? {
        return Err(AppError::not_found("auction", req.auction_id));
    }

    let bookmark = Bookmark::new(actor.as_str(), req.auction_id, req.note);
    let created = state.bookmarks.create(bookmark, &actor, &cancel).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for DELETE /bookmarks/:id
pub async fn delete_bookmark(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<Json<DeleteResponse>> {
    let actor = actor_from(&headers);
    state
        .bookmarks
        .delete(id, &actor, &CancelSignal::never())
        .await?;
    Ok(Json(DeleteResponse::new("bookmark", id)))
}

// == Reviews ==
/// Handler for GET /reviews
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(mut query): Query<ReviewQuery>,
) -> Result<Json<Paginated<Review>>> {
    state.paging.resolve(&mut query.page, &mut query.page_size)?;
    let page = state.reviews.get_paged(&query, &CancelSignal::never()).await?;
    Ok(Json(page))
}

/// Handler for POST /reviews
///
/// The reviewed seller is the auction's seller, who may not review
/// their own listing.
pub async fn create_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>)> {
    invalid(req.validate())?;
    let actor = actor_from(&headers);
    let cancel = CancelSignal::never();

    let auction = state.auctions.get_by_id(req.auction_id, &cancel).await?;
    if auction.seller.eq_ignore_ascii_case(actor.as_str()) {
        return Err(AppError::InvalidArgument(
            "Sellers cannot review their own auctions".to_string(),
        ));
    }

    let review = Review::new(
        auction.id,
        actor.as_str(),
        auction.seller,
        req.rating,
        req.comment,
    );
    let created = state.reviews.create(review, &actor, &cancel).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for GET /sellers/:seller/rating
pub async fn seller_rating(
    State(state): State<AppState>,
    Path(seller): Path<String>,
) -> Result<Json<RatingResponse>> {
    let average_rating = state
        .reviews
        .average_rating_for_seller(&seller, &CancelSignal::never())
        .await?;
    Ok(Json(RatingResponse {
        seller,
        average_rating,
    }))
}

// == Service ==
/// Handler for GET /cache/stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.cache.stats().await))
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
