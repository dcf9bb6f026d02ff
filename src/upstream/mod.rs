//! Upstream Module
//!
//! The remote image provider consulted on cache misses.

mod http_cat;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::cache::CacheKey;

pub use http_cat::{HttpCatFetcher, DEFAULT_FETCH_TIMEOUT, DEFAULT_UPSTREAM_URL};

// == Fetch Error ==
/// Why the upstream did not produce an image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The provider answered and has no image for this code
    #[error("upstream has no image for {0}")]
    NotFound(String),

    /// Transport failure, timeout or unexpected response
    #[error("{0}")]
    Unavailable(String),
}

// == Fetcher ==
/// Source of images for keys missing from the store.
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Makes a single attempt to download the image for `key`.
    async fn fetch(&self, key: &CacheKey) -> Result<Bytes, FetchError>;
}
