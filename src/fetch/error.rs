//! Backing Store Error Types
//!
//! Structured failures of a backing-store fetch. Maps HTTP status codes
//! to specific variants so the front door can pick a matching status.

use std::time::Duration;

/// Why the backing store could not produce a resource.
///
/// Clonable so one failed fetch can be reported to every request that
/// was waiting on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Backing store rejected credentials: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Rate limited by backing store")]
    RateLimited,

    #[error("Backing store did not answer within {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Backing store error ({status}): {body}")]
    Upstream { status: u16, body: String },

    #[error("Incomplete body: expected {declared} bytes, received {received}")]
    IncompleteBody { declared: u64, received: u64 },

    #[error("Backing store misconfigured: {0}")]
    Config(String),
}

impl FetchError {
    /// Create a FetchError from an HTTP status code and response body.
    ///
    /// Dropbox reports missing paths as 409 with a `not_found` error summary.
    pub fn from_status(status: u16, body: &str) -> Self {
        match status {
            401 => FetchError::Unauthorized(body.to_string()),
            403 => FetchError::Forbidden(body.to_string()),
            404 => FetchError::NotFound(body.to_string()),
            409 if body.contains("not_found") => FetchError::NotFound(body.to_string()),
            429 => FetchError::RateLimited,
            _ => FetchError::Upstream {
                status,
                body: body.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            FetchError::from_status(401, "expired"),
            FetchError::Unauthorized(_)
        ));
        assert!(matches!(
            FetchError::from_status(403, ""),
            FetchError::Forbidden(_)
        ));
        assert!(matches!(
            FetchError::from_status(404, ""),
            FetchError::NotFound(_)
        ));
        assert_eq!(FetchError::from_status(429, ""), FetchError::RateLimited);
        assert_eq!(
            FetchError::from_status(500, "boom"),
            FetchError::Upstream {
                status: 500,
                body: "boom".to_string()
            }
        );
    }

    #[test]
    fn test_conflict_depends_on_summary() {
        let missing = FetchError::from_status(409, r#"{"error_summary": "path/not_found/."}"#);
        assert!(matches!(missing, FetchError::NotFound(_)));

        let unsupported =
            FetchError::from_status(409, r#"{"error_summary": "unsupported_extension/"}"#);
        assert!(matches!(
            unsupported,
            FetchError::Upstream { status: 409, .. }
        ));
    }
}
