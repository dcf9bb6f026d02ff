//! Response DTOs for the image cache API
//!
//! Defines the structure of outgoing JSON response bodies.

use serde::Serialize;

/// Response body for the write operation (PUT /:code)
#[derive(Debug, Clone, Serialize)]
pub struct WriteResponse {
    /// Success message
    pub message: String,
    /// The status code the image was stored under
    pub code: String,
    /// Size of the stored image in bytes
    pub bytes: usize,
    /// Time of the write in RFC 3339 format
    pub stored_at: String,
}

impl WriteResponse {
    /// Creates a new WriteResponse stamped with the current time
    pub fn new(code: impl Into<String>, bytes: usize) -> Self {
        let code = code.into();
        Self {
            message: format!("Created/Updated image for {}", code),
            code,
            bytes,
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Response body for the delete operation (DELETE /:code)
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    /// Success message
    pub message: String,
    /// The status code whose image was deleted
    pub code: String,
}

impl DeleteResponse {
    /// Creates a new DeleteResponse
    pub fn new(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            message: format!("Deleted image for {}", code),
            code,
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
