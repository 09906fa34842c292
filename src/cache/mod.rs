//! Cache Module
//!
//! Bounded in-memory storage of fetched blobs with LRU eviction.

mod entry;
mod key;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub(crate) use lru::LruTracker;
pub use stats::CacheStats;
pub use store::CacheStore;

/// Cache store shared by every request handler.
///
/// A plain mutex: every operation, `get` included, reorders recency.
pub type SharedCache = std::sync::Arc<tokio::sync::Mutex<CacheStore>>;
