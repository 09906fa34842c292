//! Backing Store Seam
//!
//! The trait the fetch coordinator calls on a cache miss.

use async_trait::async_trait;
use bytes::Bytes;

use crate::cache::CacheEntry;
use crate::fetch::FetchError;
use crate::models::Variant;

/// A fully drained blob as returned by a backing store.
#[derive(Debug, Clone)]
pub struct FetchedBlob {
    pub bytes: Bytes,
    /// Length reported by the store
    pub length: u64,
    pub content_type: Option<String>,
}

impl FetchedBlob {
    /// Wraps a payload whose length is its own byte count.
    pub fn new(bytes: impl Into<Bytes>, content_type: Option<String>) -> Self {
        let bytes = bytes.into();
        Self {
            length: bytes.len() as u64,
            bytes,
            content_type,
        }
    }

    /// Converts into a cache entry, filling in the variant's default
    /// content type when the store reported none.
    pub fn into_entry(self, variant: Variant) -> CacheEntry {
        let content_type = self
            .content_type
            .unwrap_or_else(|| variant.default_content_type().to_string());
        CacheEntry::new(self.bytes, self.length, content_type)
    }
}

/// Source of truth for files and their thumbnails.
#[async_trait]
pub trait BackingStore: Send + Sync {
    /// Retrieves `variant` of the resource at `path`.
    async fn fetch(&self, path: &str, variant: Variant) -> Result<FetchedBlob, FetchError>;
}
