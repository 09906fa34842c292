//! API Module
//!
//! HTTP handlers and routing for the proxy.
//!
//! # Endpoints
//! - `GET /<size><path>` - JPEG thumbnail of a Dropbox file
//! - `GET /full/<path>` - The Dropbox file itself
//! - `GET /favicon.ico` - Ignored
//! - `GET /_stats` - Cache statistics
//! - `GET /_health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
