//! API Module
//!
//! HTTP handlers and routing for the image cache.
//!
//! # Endpoints
//! - `GET /:code` - Serve an image, fetching it upstream on a miss
//! - `PUT /:code` - Store an image
//! - `DELETE /:code` - Delete an image

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
