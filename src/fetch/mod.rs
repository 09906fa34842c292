//! Fetch Module
//!
//! Backing-store access and the coordinator that decides between serving
//! from the cache and fetching upstream.

mod backend;
mod coordinator;
mod dropbox;
mod error;

pub use backend::{BackingStore, FetchedBlob};
pub use coordinator::{CacheStatus, FetchCoordinator, FetchStats, Resolved};
pub use dropbox::DropboxClient;
pub use error::FetchError;
