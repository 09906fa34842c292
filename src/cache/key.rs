//! Cache Key Module
//!
//! Identity of a cached (resource, variant) pair.

use std::fmt;

use crate::models::Variant;

// == Cache Key ==
/// Opaque identity of one variant of one resource.
///
/// Originals are keyed `full:<path>` and thumbnails `thumb:<size>:<path>`,
/// so no two variants of a path can share an entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Derives the key for `variant` of the resource at `path`.
    pub fn new(variant: Variant, path: &str) -> Self {
        match variant {
            Variant::Original => Self(format!("full:{}", path)),
            Variant::Thumbnail(size) => Self(format!("thumb:{}:{}", size.selector(), path)),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
impl From<&str> for CacheKey {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThumbnailSize;

    #[test]
    fn test_key_format() {
        assert_eq!(CacheKey::new(Variant::Original, "/a.jpg").to_string(), "full:/a.jpg");
        assert_eq!(
            CacheKey::new(Variant::Thumbnail(ThumbnailSize::Medium), "/a.jpg").to_string(),
            "thumb:m:/a.jpg"
        );
    }

    #[test]
    fn test_original_never_collides_with_thumbnail() {
        // A path that looks like another route's key must still stay distinct
        let original = CacheKey::new(Variant::Original, "/s/a.jpg");
        let thumb = CacheKey::new(Variant::Thumbnail(ThumbnailSize::Small), "/a.jpg");
        assert_ne!(original, thumb);
    }
}
