//! Resource Variants
//!
//! Which rendition of a backing-store resource a request asks for.

use std::fmt;

// == Thumbnail Size ==
/// Thumbnail sizes selectable by a single path character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThumbnailSize {
    /// `s` - 64x64
    Small,
    /// `m` - 128x128
    Medium,
    /// `l` - 640x480
    Large,
    /// `x` - 1024x768
    ExtraLarge,
}

impl ThumbnailSize {
    /// Parses a size selector character.
    ///
    /// Returns None for any character that does not name a size.
    pub fn from_selector(selector: char) -> Option<Self> {
        match selector {
            's' => Some(Self::Small),
            'm' => Some(Self::Medium),
            'l' => Some(Self::Large),
            'x' => Some(Self::ExtraLarge),
            _ => None,
        }
    }

    /// The selector character that names this size in request paths.
    pub fn selector(self) -> char {
        match self {
            Self::Small => 's',
            Self::Medium => 'm',
            Self::Large => 'l',
            Self::ExtraLarge => 'x',
        }
    }

    /// The size tag understood by the Dropbox thumbnail endpoint.
    pub fn dropbox_tag(self) -> &'static str {
        match self {
            Self::Small => "w64h64",
            Self::Medium => "w128h128",
            Self::Large => "w640h480",
            Self::ExtraLarge => "w1024h768",
        }
    }
}

// == Variant ==
/// A requested rendition of a resource.
///
/// Thumbnails are always JPEG; the original is served verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    Original,
    Thumbnail(ThumbnailSize),
}

impl Variant {
    /// Content type used when the backing store does not report one.
    pub fn default_content_type(self) -> &'static str {
        match self {
            Variant::Original => "application/octet-stream",
            Variant::Thumbnail(_) => "image/jpeg",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Original => write!(f, "original"),
            Variant::Thumbnail(size) => write!(f, "thumbnail:{}", size.dropbox_tag()),
        }
    }
}
