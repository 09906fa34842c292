//! Resource Request Parsing
//!
//! Turns a raw request path into a structured `ResourceRequest`.
//!
//! # Path Shapes
//! - `/full/<resource path>` - the original file
//! - `/<size><resource path>` - a JPEG thumbnail, `<size>` being one of `s m l x`
//!
//! The slash between the size selector and the resource path is optional,
//! so `/sPhotos/a.jpg` and `/s/Photos/a.jpg` name the same thumbnail.

use crate::cache::CacheKey;
use crate::error::{ProxyError, Result};
use crate::models::{ThumbnailSize, Variant};

/// Prefix of the original-file route, without the leading slash.
const ORIGINAL_PREFIX: &str = "full/";

// == Resource Request ==
/// A parsed request for one variant of one backing-store resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRequest {
    /// Absolute, percent-decoded path in the backing store
    pub path: String,
    /// Requested rendition
    pub variant: Variant,
}

impl ResourceRequest {
    // == Constructor ==
    /// Builds a request from already-validated parts.
    ///
    /// The path is normalized to exactly one leading slash.
    pub fn new(path: &str, variant: Variant) -> Result<Self> {
        Ok(Self {
            path: normalize_resource_path(path)?,
            variant,
        })
    }

    // == Parse ==
    /// Parses a raw (still percent-encoded) URI path.
    ///
    /// Fails with `MalformedRequest` when the path is too short to carry a
    /// resource, names an unknown thumbnail size, or does not decode to UTF-8.
    pub fn parse(raw_path: &str) -> Result<Self> {
        let decoded = urlencoding::decode(raw_path).map_err(|_| {
            ProxyError::MalformedRequest("path is not valid UTF-8 once decoded".to_string())
        })?;

        let rest = decoded.strip_prefix('/').ok_or_else(|| {
            ProxyError::MalformedRequest("path must start with '/'".to_string())
        })?;

        if let Some(resource) = rest.strip_prefix(ORIGINAL_PREFIX) {
            return Self::new(resource, Variant::Original);
        }

        let mut chars = rest.chars();
        let selector = chars
            .next()
            .ok_or_else(|| ProxyError::MalformedRequest("missing size selector".to_string()))?;
        let size = ThumbnailSize::from_selector(selector).ok_or_else(|| {
            ProxyError::MalformedRequest(format!("unknown thumbnail size '{}'", selector))
        })?;

        Self::new(chars.as_str(), Variant::Thumbnail(size))
    }

    // == Cache Key ==
    /// Derives the cache identity of this request.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(self.variant, &self.path)
    }
}

fn normalize_resource_path(path: &str) -> Result<String> {
    let trimmed = path.trim_start_matches('/');
    if trimmed.is_empty() {
        return Err(ProxyError::MalformedRequest(
            "missing resource path".to_string(),
        ));
    }
    Ok(format!("/{}", trimmed))
}
