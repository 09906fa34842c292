//! API Routes
//!
//! Configures the Axum router with the resource and administrative endpoints.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    favicon_handler, health_handler, resource_handler, stats_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /full/*path` - Original file
/// - `GET /favicon.ico` - Ignored, empty response
/// - `GET /_stats` - Cache statistics
/// - `GET /_health` - Health check endpoint
/// - anything else - Thumbnail, `/<size><path>`
///
/// Administrative paths start with `_`, which is never a size selector.
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/full/*path", get(resource_handler))
        .route("/favicon.ico", get(favicon_handler))
        .route("/_stats", get(stats_handler))
        .route("/_health", get(health_handler))
        .fallback(get(resource_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheStore;
    use crate::fetch::{BackingStore, FetchError, FetchedBlob};
    use crate::models::Variant;
    use async_trait::async_trait;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use std::time::Duration;
    use tower::util::ServiceExt;

    struct EmptyStore;

    #[async_trait]
    impl BackingStore for EmptyStore {
        async fn fetch(&self, path: &str, _variant: Variant) -> Result<FetchedBlob, FetchError> {
            Err(FetchError::NotFound(path.to_string()))
        }
    }

    fn create_test_app() -> Router {
        let state = AppState::new(
            CacheStore::new(100),
            Arc::new(EmptyStore),
            Duration::from_secs(1),
        );
        create_router(state)
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
        assert_eq!(status_of("/_health").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_stats_endpoint() {
        assert_eq!(status_of("/_stats").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_favicon_endpoint() {
        assert_eq!(status_of("/favicon.ico").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_thumbnail_fallback_reaches_store() {
        assert_eq!(status_of("/sPhotos/a.jpg").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_original_route_reaches_store() {
        assert_eq!(status_of("/full/Photos/a.jpg").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_root_is_malformed() {
        assert_eq!(status_of("/").await, StatusCode::BAD_REQUEST);
    }
}
