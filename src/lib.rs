//! Thumb Proxy - An in-memory caching proxy for Dropbox files
//!
//! Serves originals and JPEG thumbnails from Dropbox, keeping recently
//! requested ones in a bounded LRU cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod fetch;
pub mod models;

pub use api::AppState;
pub use config::Config;
