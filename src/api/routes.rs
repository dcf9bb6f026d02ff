//! API Routes
//!
//! Configures the Axum router for the image cache.

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use tower_http::trace::TraceLayer;

use super::handlers::{
    delete_handler, invalid_path, method_not_allowed, read_handler, write_handler, AppState,
};
use crate::cache::MAX_IMAGE_SIZE;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /:code` - Serve an image, fetching it upstream on a miss
/// - `PUT /:code` - Store the request body as the image
/// - `DELETE /:code` - Remove the cached image
///
/// Other methods on `/:code`, HEAD included, get 405; any other path
/// gets 400.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/:code",
            get(read_handler)
                .head(method_not_allowed)
                .put(write_handler)
                .delete(delete_handler)
                .fallback(method_not_allowed),
        )
        .fallback(invalid_path)
        .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheKey, ImageCache, MemoryStore};
    use crate::upstream::{FetchError, Fetcher};
    use async_trait::async_trait;
    use axum::{
        body::{Body, Bytes},
        http::{Request, StatusCode},
    };
    use std::sync::Arc;
    use tower::util::ServiceExt;

    struct NoUpstream;

    #[async_trait]
    impl Fetcher for NoUpstream {
        async fn fetch(&self, key: &CacheKey) -> Result<Bytes, FetchError> {
            Err(FetchError::NotFound(key.to_string()))
        }
    }

    struct CatUpstream;

    #[async_trait]
    impl Fetcher for CatUpstream {
        async fn fetch(&self, _key: &CacheKey) -> Result<Bytes, FetchError> {
            Ok(Bytes::from_static(b"cat"))
        }
    }

    fn create_test_app() -> Router {
        let cache = ImageCache::new(Arc::new(MemoryStore::new()), Arc::new(NoUpstream));
        create_router(AppState::new(cache))
    }

    async fn status_of(app: Router, method: &str, uri: &str) -> StatusCode {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
        .status()
    }

    #[tokio::test]
    async fn test_root_is_invalid() {
        assert_eq!(status_of(create_test_app(), "GET", "/").await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_nested_path_is_invalid() {
        assert_eq!(
            status_of(create_test_app(), "GET", "/404/cat").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(create_test_app(), "DELETE", "/4/0/4").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_percent_encoded_digits_are_invalid() {
        assert_eq!(
            status_of(create_test_app(), "GET", "/%34%30%34").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_get_not_found() {
        assert_eq!(status_of(create_test_app(), "GET", "/404").await, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_unsupported_methods() {
        for method in ["HEAD", "POST", "PATCH", "OPTIONS"] {
            assert_eq!(
                status_of(create_test_app(), method, "/200").await,
                StatusCode::METHOD_NOT_ALLOWED,
                "{method}"
            );
        }
        assert_eq!(
            status_of(create_test_app(), "POST", "/20").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_head_does_not_fill_store() {
        let store = Arc::new(MemoryStore::new());
        let cache = ImageCache::new(store.clone(), Arc::new(CatUpstream));
        let app = create_router(AppState::new(cache));

        assert_eq!(
            status_of(app, "HEAD", "/404").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_query_string_is_invalid() {
        assert_eq!(
            status_of(create_test_app(), "GET", "/404?size=small").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(create_test_app(), "GET", "/404/?x").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_oversized_upload_rejected() {
        let response = create_test_app()
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/413")
                    .body(Body::from(vec![0u8; MAX_IMAGE_SIZE + 1]))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
