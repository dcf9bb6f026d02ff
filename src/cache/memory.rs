//! In-memory Blob Store
//!
//! HashMap-backed store for tests and embedding; nothing survives the process.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::cache::{BlobStore, CacheKey};
use crate::error::{CacheError, Result};

// == Memory Store ==
/// Volatile [`BlobStore`] guarded by a single `RwLock`.
///
/// Entries are swapped whole under the write lock, so readers always see a
/// complete blob.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<CacheKey, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn read(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn write(&self, key: &CacheKey, bytes: Bytes) -> Result<()> {
        self.entries.write().await.insert(key.clone(), bytes);
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<()> {
        match self.entries.write().await.remove(key) {
            Some(_) => Ok(()),
            None => Err(CacheError::NotFound(key.to_string())),
        }
    }

    async fn exists(&self, key: &CacheKey) -> bool {
        self.entries.read().await.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str) -> CacheKey {
        CacheKey::validate(code).unwrap()
    }

    #[tokio::test]
    async fn test_memory_store_new() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);
        assert_eq!(store.read(&key("200")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_memory_store_overwrite() {
        let store = MemoryStore::new();
        store.write(&key("418"), Bytes::from_static(b"one")).await.unwrap();
        store.write(&key("418"), Bytes::from_static(b"two")).await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(
            store.read(&key("418")).await.unwrap(),
            Some(Bytes::from_static(b"two"))
        );
    }

    #[tokio::test]
    async fn test_memory_store_delete() {
        let store = MemoryStore::new();
        store.write(&key("500"), Bytes::from_static(b"x")).await.unwrap();
        assert!(store.exists(&key("500")).await);

        store.delete(&key("500")).await.unwrap();
        assert!(!store.exists(&key("500")).await);
        assert!(matches!(
            store.delete(&key("500")).await,
            Err(CacheError::NotFound(_))
        ));
    }
}
