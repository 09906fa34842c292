//! Request and response models for the proxy
//!
//! Parsed resource requests, their variants, and the JSON bodies of the
//! administrative endpoints.

pub mod request;
pub mod responses;
pub mod variant;

// Re-export commonly used types
pub use request::ResourceRequest;
pub use responses::{ErrorResponse, HealthResponse, StatsResponse};
pub use variant::{ThumbnailSize, Variant};
