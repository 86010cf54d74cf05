//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    count_auctions, count_auctions_by_status, create_auction, create_bookmark, create_review,
    delete_auction, delete_bookmark, get_auction, health_handler, list_auctions, list_bookmarks,
    list_reviews, seller_rating, stats_handler, update_auction, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/auctions", get(list_auctions).post(create_auction))
        .route("/auctions/count", get(count_auctions))
        .route("/auctions/count/by-status", get(count_auctions_by_status))
        .route(
            "/auctions/:id",
            get(get_auction).put(update_auction).delete(delete_auction),
        )
        .route("/bookmarks", get(list_bookmarks).post(create_bookmark))
        .route("/bookmarks/:id", delete(delete_bookmark))
        .route("/reviews", get(list_reviews).post(create_review))
        .route("/sellers/:seller/rating", get(seller_rating))
        .route("/cache/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use tower::util::ServiceExt;

    fn create_test_app() -> Router {
        create_router(AppState::from_config(&Config::default()))
    }

    async fn status_of(uri: &str) -> StatusCode {
        create_test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        assert_eq!(status_of("/health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of("/cache/stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_count_route_is_not_an_id() {
        assert_eq!(status_of("/auctions/count").await, StatusCode::OK);
        assert_eq!(status_of("/auctions/count/by-status").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_unknown_auction() {
        let uri = format!("/auctions/{}", uuid::Uuid::new_v4());
        assert_eq!(status_of(&uri).await, StatusCode::NOT_FOUND);
    }
}
