//! Blob Store Module
//!
//! Storage-agnostic contract the cache is built on.

use async_trait::async_trait;
use bytes::Bytes;

use crate::cache::CacheKey;
use crate::error::Result;

// == Blob Store ==
/// Durable key to bytes mapping.
///
/// Implementations must be safe to call from many requests at once and must
/// never let a reader observe a partially written blob. A missing entry is
/// not an error on `read`; `delete` of a missing entry returns
/// [`CacheError::NotFound`](crate::error::CacheError::NotFound). Any other
/// failure is [`CacheError::Storage`](crate::error::CacheError::Storage).
#[async_trait]
pub trait BlobStore: Send + Sync + 'static {
    /// Returns the stored bytes, or `None` if no entry exists.
    async fn read(&self, key: &CacheKey) -> Result<Option<Bytes>>;

    /// Stores `bytes`, replacing any existing entry.
    async fn write(&self, key: &CacheKey, bytes: Bytes) -> Result<()>;

    /// Removes the entry for `key`.
    async fn delete(&self, key: &CacheKey) -> Result<()>;

    /// True if `read` would return bytes.
    async fn exists(&self, key: &CacheKey) -> bool {
        matches!(self.read(key).await, Ok(Some(_)))
    }
}
