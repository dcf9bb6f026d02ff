//! Error types for the image cache
//!
//! Provides unified error handling using thiserror. Every variant maps to
//! exactly one HTTP status code at the request boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::upstream::FetchError;

// == Cache Error Enum ==
/// Unified error type for the image cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Request path is not a three-digit status code
    #[error("Invalid HTTP status code in URL: {0:?}")]
    InvalidKey(String),

    /// No cached entry for the key (delete path)
    #[error("Image not found in cache: {0}")]
    NotFound(String),

    /// Neither the cache nor the upstream provider has an image
    #[error("Image not found on cache or upstream server: {0}")]
    NotFoundAnywhere(String),

    /// Upstream provider failed or could not be reached
    #[error("Upstream fetch failed: {0}")]
    Upstream(String),

    /// Backing store failed to read, write or delete
    #[error("Storage error: {0}")]
    Storage(String),

    /// Request method is not read, write or delete
    #[error("Method not allowed")]
    MethodNotAllowed,
}

impl CacheError {
    /// Status code this error is reported with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            CacheError::InvalidKey(_) => StatusCode::BAD_REQUEST,
            CacheError::NotFound(_) | CacheError::NotFoundAnywhere(_) => StatusCode::NOT_FOUND,
            CacheError::Upstream(_) | CacheError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

// == Fetch Error Conversion ==
impl From<FetchError> for CacheError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(code) => CacheError::NotFoundAnywhere(code),
            FetchError::Unavailable(msg) => CacheError::Upstream(msg),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the image cache.
pub type Result<T> = std::result::Result<T, CacheError>;
