//! Image Cache Module
//!
//! Combines a [`BlobStore`] with an upstream [`Fetcher`]: reads fall through
//! to the upstream on a miss and persist what they fetch, writes and deletes
//! go straight to the store.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::cache::{BlobStore, CacheKey, CacheStats, StatsSnapshot};
use crate::error::Result;
use crate::upstream::{FetchError, Fetcher};

// == Image Cache ==
/// Read-through cache over a store and a fetcher.
///
/// Requests for different keys share nothing but the counters. Two misses
/// on the same key may both fetch and both write; the last write wins.
#[derive(Clone)]
pub struct ImageCache {
    store: Arc<dyn BlobStore>,
    fetcher: Arc<dyn Fetcher>,
    stats: Arc<CacheStats>,
}

impl ImageCache {
    pub fn new(store: Arc<dyn BlobStore>, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            store,
            fetcher,
            stats: Arc::new(CacheStats::new()),
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn BlobStore> {
        &self.store
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    // == Resolve Read ==
    /// Returns the image for `key`, fetching and persisting it on a miss.
    ///
    /// Bytes are only returned once they are durable: if the fetched image
    /// cannot be written, the read fails with
    /// [`CacheError::Storage`](crate::error::CacheError::Storage).
    /// The upstream is tried once; failures leave the store untouched.
    pub async fn resolve_read(&self, key: &CacheKey) -> Result<Bytes> {
        if let Some(bytes) = self.store.read(key).await? {
            self.stats.record_hit();
            debug!(code = %key, "Serving image from cache");
            return Ok(bytes);
        }

        self.stats.record_miss();
        info!(code = %key, "Image not in cache, requesting upstream");

        let bytes = match self.fetcher.fetch(key).await {
            Ok(bytes) => bytes,
            Err(e) => {
                match &e {
                    FetchError::NotFound(_) => {
                        self.stats.record_upstream_not_found();
                        info!(code = %key, "Upstream has no image");
                    }
                    FetchError::Unavailable(reason) => {
                        self.stats.record_upstream_fault();
                        warn!(code = %key, %reason, "Upstream fetch failed");
                    }
                }
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.write(key, bytes.clone()).await {
            warn!(code = %key, error = %e, "Fetched image could not be persisted");
            return Err(e);
        }

        self.stats.record_fill();
        info!(code = %key, bytes = bytes.len(), "Saved upstream image in cache");
        Ok(bytes)
    }

    // == Write ==
    /// Stores `bytes` verbatim under `key`, replacing any existing image.
    pub async fn write(&self, key: &CacheKey, bytes: Bytes) -> Result<()> {
        let len = bytes.len();
        self.store.write(key, bytes).await?;
        info!(code = %key, bytes = len, "Stored image");
        Ok(())
    }

    // == Delete ==
    /// Removes the image for `key`.
    ///
    /// Fails with [`CacheError::NotFound`](crate::error::CacheError::NotFound)
    /// if there is none.
    pub async fn delete(&self, key: &CacheKey) -> Result<()> {
        self.store.delete(key).await?;
        info!(code = %key, "Deleted image");
        Ok(())
    }

    pub async fn exists(&self, key: &CacheKey) -> bool {
        self.store.exists(key).await
    }
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("stats", &self.stats.snapshot())
            .finish_non_exhaustive()
    }
}
