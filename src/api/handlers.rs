//! API Handlers
//!
//! HTTP request handlers for resources and the administrative endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, HeaderValue, Uri},
    response::{IntoResponse, Response},
    Json,
};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::{BackingStore, DropboxClient, FetchCoordinator, FetchError, Resolved};
use crate::models::{HealthResponse, ResourceRequest, StatsResponse};

/// Response header reporting how the payload was obtained
const X_CACHE: HeaderName = HeaderName::from_static("x-cache");

/// Application state shared across all handlers.
///
/// The coordinator owns the shared cache; handlers reach the cache only
/// through it.
#[derive(Clone)]
pub struct AppState {
    pub coordinator: Arc<FetchCoordinator>,
}

impl AppState {
    /// Creates a new AppState from a cache and the store behind it.
    pub fn new(cache: CacheStore, backend: Arc<dyn BackingStore>, fetch_timeout: Duration) -> Self {
        let cache = Arc::new(Mutex::new(cache));
        Self {
            coordinator: Arc::new(FetchCoordinator::new(cache, backend, fetch_timeout)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Sizes the cache and builds the Dropbox client from the Config.
    pub fn from_config(config: &Config) -> std::result::Result<Self, FetchError> {
        let backend = DropboxClient::from_config(config)?;
        Ok(Self::new(
            CacheStore::new(config.max_entries),
            Arc::new(backend),
            config.fetch_timeout(),
        ))
    }
}

/// Handler for GET /full/*path and every thumbnail path
///
/// Parses the path, resolves it through the cache, and writes the payload
/// with its stored length as `Content-Length`.
pub async fn resource_handler(State(state): State<AppState>, uri: Uri) -> Result<Response> {
    let request = ResourceRequest::parse(uri.path()).map_err(|err| {
        debug!(path = %uri.path(), error = %err, "Rejected request path");
        err
    })?;

    let resolved = state.coordinator.resolve(&request).await.map_err(|err| {
        warn!(
            path = %request.path,
            variant = %request.variant,
            error = %err,
            "Failed to serve resource"
        );
        err
    })?;

    Ok(blob_response(resolved))
}

fn blob_response(resolved: Resolved) -> Response {
    let Resolved { entry, status } = resolved;
    let content_type = HeaderValue::from_str(&entry.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));

    (
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_LENGTH, HeaderValue::from(entry.length)),
            (X_CACHE, HeaderValue::from_static(status.as_str())),
        ],
        entry.bytes,
    )
        .into_response()
}

/// Handler for GET /favicon.ico
///
/// Browsers ask for it unprompted; answer with an empty body.
pub async fn favicon_handler() {}

/// Handler for GET /_stats
///
/// Returns cache and backing-store statistics.
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache_stats = state.coordinator.cache().lock().await.stats();
    let fetch_stats = state.coordinator.stats();

    Json(StatsResponse::new(&cache_stats, &fetch_stats))
}

/// Handler for GET /_health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
