//! Error types for the proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use thiserror::Error;

use crate::fetch::FetchError;
use crate::models::ErrorResponse;

// == Proxy Error Enum ==
/// Unified error type for request handling.
#[derive(Error, Debug)]
pub enum ProxyError {
    /// Request path does not name a resource
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    /// The backing store could not produce the resource
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl ProxyError {
    /// HTTP status this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ProxyError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            ProxyError::Fetch(err) => match err {
                FetchError::NotFound(_) => StatusCode::NOT_FOUND,
                FetchError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                FetchError::Forbidden(_) => StatusCode::FORBIDDEN,
                FetchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                FetchError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                FetchError::Transport(_)
                | FetchError::Upstream { .. }
                | FetchError::IncompleteBody { .. } => StatusCode::BAD_GATEWAY,
                FetchError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the proxy.
pub type Result<T> = std::result::Result<T, ProxyError>;
