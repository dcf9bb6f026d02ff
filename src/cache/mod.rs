//! Cache Module
//!
//! Key validation, blob storage backends and the read-through image cache.

mod fs_store;
mod key;
mod memory;
mod resolver;
mod stats;
mod store;


// Re-export public types
pub use fs_store::FileStore;
pub use key::CacheKey;
pub use memory::MemoryStore;
pub use resolver::ImageCache;
pub use stats::{CacheStats, StatsSnapshot};
pub use store::BlobStore;

// == Public Constants ==
/// Extension appended to a key to name its blob
pub const IMAGE_EXTENSION: &str = "jpeg";

/// Content type images are served with
pub const IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Maximum accepted upload size in bytes
pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10 MB
