//! HTTP Cat Cache - A caching proxy for HTTP status code images
//!
//! Serves `GET /:code` from a directory of images, falling back to an
//! upstream provider on a miss and persisting what it fetches.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod upstream;

pub use api::{create_router, AppState};
pub use config::Config;
pub use error::CacheError;
