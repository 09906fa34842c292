//! Cache Entry Module
//!
//! Defines the immutable payload stored for each cached resource variant.

use bytes::Bytes;

// == Cache Entry ==
/// A cached blob together with the metadata needed to serve it.
///
/// Entries are never mutated after creation. Cloning is cheap: the payload
/// is a reference-counted buffer shared between the cache and responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Payload bytes
    pub bytes: Bytes,
    /// Byte length reported by the backing store, trusted for Content-Length
    pub length: u64,
    /// MIME type to serve the payload with
    pub content_type: String,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// # Arguments
    /// * `bytes` - The payload
    /// * `length` - Declared byte length of the payload
    /// * `content_type` - MIME type of the payload
    pub fn new(bytes: impl Into<Bytes>, length: u64, content_type: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            length,
            content_type: content_type.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(b"jpeg-bytes".to_vec(), 10, "image/jpeg");

        assert_eq!(entry.bytes.as_ref(), b"jpeg-bytes");
        assert_eq!(entry.length, 10);
        assert_eq!(entry.content_type, "image/jpeg");
    }

    #[test]
    fn test_entry_clone_shares_payload() {
        let entry = CacheEntry::new(vec![7u8; 1024], 1024, "application/octet-stream");
        let copy = entry.clone();

        assert_eq!(entry.bytes.as_ptr(), copy.bytes.as_ptr());
        assert_eq!(entry, copy);
    }

    #[test]
    fn test_zero_length_entry_is_valid() {
        let entry = CacheEntry::new(Vec::new(), 0, "text/plain");
        assert!(entry.bytes.is_empty());
        assert_eq!(entry.length, 0);
    }
}
