//! Response models for the image cache API
//!
//! Images travel as raw bytes; these DTOs cover the JSON bodies returned for
//! writes, deletes and errors.

pub mod responses;

// Re-export commonly used types
pub use responses::{DeleteResponse, ErrorResponse, WriteResponse};
