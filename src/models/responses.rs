//! Response DTOs for the administrative endpoints
//!
//! Defines the JSON bodies returned by `/_stats`, `/_health` and every
//! failed resource request.

use serde::Serialize;

use crate::cache::CacheStats;
use crate::fetch::FetchStats;

/// Response body for the stats endpoint (GET /_stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    /// Number of cache hits
    pub hits: u64,
    /// Number of cache misses
    pub misses: u64,
    /// Number of LRU evictions
    pub evictions: u64,
    /// Current number of entries in cache
    pub total_entries: usize,
    /// Configured maximum number of entries
    pub capacity: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
    /// Round trips made to the backing store
    pub backing_fetches: u64,
    /// Backing round trips that failed or timed out
    pub fetch_failures: u64,
    /// Requests that waited on another request's in-flight fetch
    pub coalesced: u64,
}

impl StatsResponse {
    /// Creates a StatsResponse from cache and coordinator statistics
    pub fn new(cache: &CacheStats, fetch: &FetchStats) -> Self {
        Self {
            hits: cache.hits,
            misses: cache.misses,
            evictions: cache.evictions,
            total_entries: cache.total_entries,
            capacity: cache.capacity,
            hit_rate: cache.hit_rate(),
            backing_fetches: fetch.backing_fetches,
            fetch_failures: fetch.fetch_failures,
            coalesced: fetch.coalesced,
        }
    }
}

/// Response body for the health endpoint (GET /_health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
