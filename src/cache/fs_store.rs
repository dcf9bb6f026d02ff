//! Filesystem Blob Store
//!
//! Stores each entry as `<code>.jpeg` in a single cache directory.
//!
//! # Layout
//!
//! ```text
//! <cache_dir>/
//!   404.jpeg              # committed entry
//!   .404.jpeg.<pid>.<n>.tmp   # in-flight write, renamed over 404.jpeg
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::cache::{BlobStore, CacheKey};
use crate::error::{CacheError, Result};

const TEMP_SUFFIX: &str = ".tmp";

// == File Store ==
/// [`BlobStore`] backed by a directory of files.
///
/// Writes go to a uniquely named temporary file in the same directory and are
/// renamed over the target, so concurrent readers see either the old or the
/// new file in full.
#[derive(Debug)]
pub struct FileStore {
    root: PathBuf,
    next_temp_id: AtomicU64,
}

impl FileStore {
    // == Open ==
    /// Opens the store rooted at `root`, creating the directory if needed.
    ///
    /// Fails if the path exists but is not a directory, or if it cannot be
    /// inspected or created. Leftover temporary files from interrupted
    /// writes are removed.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();

        match fs::metadata(&root).await {
            Ok(meta) if meta.is_dir() => {
                info!(path = %root.display(), "Cache directory already exists");
            }
            Ok(_) => {
                return Err(CacheError::Storage(format!(
                    "cache path {} is not a directory",
                    root.display()
                )));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %root.display(), "Creating cache directory");
                fs::create_dir_all(&root).await.map_err(|e| {
                    CacheError::Storage(format!(
                        "failed to create cache directory {}: {}",
                        root.display(),
                        e
                    ))
                })?;
            }
            Err(e) => {
                return Err(CacheError::Storage(format!(
                    "failed to access cache directory {}: {}",
                    root.display(),
                    e
                )));
            }
        }

        let store = Self {
            root,
            next_temp_id: AtomicU64::new(0),
        };

        let swept = store.sweep_temp_files().await?;
        if swept > 0 {
            info!(count = swept, "Removed leftover temporary files");
        }

        Ok(store)
    }

    /// Root directory of the store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the committed blob for `key`.
    pub fn blob_path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.file_name())
    }

    fn temp_path(&self, key: &CacheKey) -> PathBuf {
        let id = self.next_temp_id.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(
            ".{}.{}.{}{}",
            key.file_name(),
            std::process::id(),
            id,
            TEMP_SUFFIX
        ))
    }

    // == Sweep ==
    /// Deletes temporary files left behind by a previous process.
    async fn sweep_temp_files(&self) -> Result<usize> {
        let mut dir = fs::read_dir(&self.root).await.map_err(|e| {
            CacheError::Storage(format!(
                "failed to list cache directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let mut removed = 0;
        loop {
            let entry = match dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Stopped sweeping cache directory");
                    break;
                }
            };

            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !(name.starts_with('.') && name.ends_with(TEMP_SUFFIX)) {
                continue;
            }

            match fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) => warn!(file = %name, error = %e, "Failed to remove temporary file"),
            }
        }

        Ok(removed)
    }

    async fn write_temp(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FileStore {
    async fn read(&self, key: &CacheKey) -> Result<Option<Bytes>> {
        let path = self.blob_path(key);

        match fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CacheError::Storage(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn write(&self, key: &CacheKey, bytes: Bytes) -> Result<()> {
        let temp_path = self.temp_path(key);
        let path = self.blob_path(key);

        if let Err(e) = Self::write_temp(&temp_path, &bytes).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Storage(format!(
                "failed to write temp file for {}: {}",
                key, e
            )));
        }

        if let Err(e) = fs::rename(&temp_path, &path).await {
            let _ = fs::remove_file(&temp_path).await;
            return Err(CacheError::Storage(format!(
                "failed to commit {}: {}",
                path.display(),
                e
            )));
        }

        debug!(code = %key, bytes = bytes.len(), "Stored blob");
        Ok(())
    }

    async fn delete(&self, key: &CacheKey) -> Result<()> {
        let path = self.blob_path(key);

        match fs::remove_file(&path).await {
            Ok(()) => {
                debug!(code = %key, "Deleted blob");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Err(CacheError::NotFound(key.to_string())),
            Err(e) => Err(CacheError::Storage(format!(
                "failed to delete {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn exists(&self, key: &CacheKey) -> bool {
        fs::metadata(self.blob_path(key))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }
}
