//! API Handlers
//!
//! HTTP request handlers for reading, writing and deleting cached images.
//! Every handler validates the request path before touching the cache.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, Method, StatusCode, Uri},
    response::IntoResponse,
    Json,
};
use tracing::{debug, info};

use crate::cache::{CacheKey, FileStore, ImageCache, IMAGE_CONTENT_TYPE};
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{DeleteResponse, WriteResponse};
use crate::upstream::HttpCatFetcher;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Read-through image cache
    pub cache: ImageCache,
}

impl AppState {
    /// Creates a new AppState around the given cache.
    pub fn new(cache: ImageCache) -> Self {
        Self { cache }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Opens (and if needed creates) the cache directory and sets up the
    /// http.cat client. Any failure here must stop startup.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let store = FileStore::open(&config.cache_dir).await?;
        let fetcher = HttpCatFetcher::public()?;
        Ok(Self::new(ImageCache::new(Arc::new(store), Arc::new(fetcher))))
    }
}

/// Raw request target as received, query string included.
///
/// `/404?size=small` is not a valid code, so the query is part of what gets
/// validated.
fn request_target(uri: &Uri) -> &str {
    uri.path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path())
}

/// Handler for GET /:code
///
/// Serves the cached image, fetching it from the upstream on a miss.
pub async fn read_handler(State(state): State<AppState>, uri: Uri) -> Result<impl IntoResponse> {
    let key = CacheKey::validate(request_target(&uri))?;
    let image = state.cache.resolve_read(&key).await?;

    info!(code = %key, bytes = image.len(), "Sending image");
    Ok(([(header::CONTENT_TYPE, IMAGE_CONTENT_TYPE)], image))
}

/// Handler for PUT /:code
///
/// Stores the request body verbatim as the image for the code.
pub async fn write_handler(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let key = CacheKey::validate(request_target(&uri))?;
    let len = body.len();
    state.cache.write(&key, body).await?;

    Ok((StatusCode::CREATED, Json(WriteResponse::new(key.as_str(), len))))
}

/// Handler for DELETE /:code
///
/// Removes the cached image for the code.
pub async fn delete_handler(
    State(state): State<AppState>,
    uri: Uri,
) -> Result<Json<DeleteResponse>> {
    let key = CacheKey::validate(request_target(&uri))?;
    state.cache.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key.as_str())))
}

/// Fallback for HEAD and any other method on /:code
///
/// A malformed code is still reported as such; otherwise 405.
pub async fn method_not_allowed(method: Method, uri: Uri) -> CacheError {
    if let Err(e) = CacheKey::validate(request_target(&uri)) {
        return e;
    }
    debug!(%method, target = request_target(&uri), "Rejecting unsupported method");
    CacheError::MethodNotAllowed
}

/// Fallback for paths that are not a single segment
pub async fn invalid_path(uri: Uri) -> CacheError {
    CacheError::InvalidKey(request_target(&uri).to_string())
}
