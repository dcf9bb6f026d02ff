//! http.cat client
//!
//! `GET {base_url}/{code}` with a bounded timeout and body size. 404 means
//! the provider has no image; every other failure is reported as unavailable.

use std::time::Duration;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use reqwest::StatusCode;
use tracing::debug;

use super::{FetchError, Fetcher};
use crate::cache::{CacheKey, MAX_IMAGE_SIZE};

/// Base URL of the public provider.
pub const DEFAULT_UPSTREAM_URL: &str = "https://http.cat";

/// Upper bound on a single upstream request, body included.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

// == HTTP Cat Fetcher ==
#[derive(Debug, Clone)]
pub struct HttpCatFetcher {
    client: reqwest::Client,
    base_url: String,
    /// Largest body accepted from the upstream, same cap as uploads
    max_size: usize,
}

impl HttpCatFetcher {
    /// Creates a fetcher for `base_url` whose requests give up after `timeout`.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| FetchError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            max_size: MAX_IMAGE_SIZE,
        })
    }

    /// Overrides the largest accepted image size.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Fetcher for the public http.cat service.
    pub fn public() -> Result<Self, FetchError> {
        Self::new(DEFAULT_UPSTREAM_URL, DEFAULT_FETCH_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, key: &CacheKey) -> String {
        format!("{}/{}", self.base_url, key)
    }
}

#[async_trait]
impl Fetcher for HttpCatFetcher {
    async fn fetch(&self, key: &CacheKey) -> Result<Bytes, FetchError> {
        let url = self.url_for(key);
        debug!(%url, "Requesting upstream image");

        let mut response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Unavailable(format!("request to {} timed out", url))
            } else {
                FetchError::Unavailable(format!("request to {} failed: {}", url, e))
            }
        })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(FetchError::NotFound(key.to_string()));
        }
        if !status.is_success() {
            return Err(FetchError::Unavailable(format!(
                "{} responded with {}",
                url, status
            )));
        }

        if let Some(len) = response.content_length() {
            if len > self.max_size as u64 {
                return Err(FetchError::Unavailable(format!(
                    "{} sent {} bytes, limit is {}",
                    url, len, self.max_size
                )));
            }
        }

        // Content-Length may be absent or wrong, so the cap is enforced while reading
        let mut body = BytesMut::new();
        loop {
            let chunk = response.chunk().await.map_err(|e| {
                FetchError::Unavailable(format!("failed to read body from {}: {}", url, e))
            })?;
            let Some(chunk) = chunk else { break };

            if body.len() + chunk.len() > self.max_size {
                return Err(FetchError::Unavailable(format!(
                    "{} sent more than {} bytes",
                    url, self.max_size
                )));
            }
            body.extend_from_slice(&chunk);
        }

        Ok(body.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(code: &str) -> CacheKey {
        CacheKey::validate(code).unwrap()
    }

    fn create_test_fetcher(mock_server: &MockServer, timeout: Duration) -> HttpCatFetcher {
        HttpCatFetcher::new(format!("{}/", mock_server.uri()), timeout).expect("failed to build fetcher")
    }

    #[test]
    fn test_public_fetcher() {
        let fetcher = HttpCatFetcher::public().unwrap();
        assert_eq!(fetcher.base_url(), "https://http.cat");
        assert_eq!(fetcher.url_for(&key("418")), "https://http.cat/418");
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/404"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"\xFF\xD8jpeg".to_vec())
                    .insert_header("content-type", "image/jpeg"),
            )
            .mount(&mock_server)
            .await;

        let fetcher = create_test_fetcher(&mock_server, Duration::from_secs(5));
        let bytes = fetcher.fetch(&key("404")).await.unwrap();
        assert_eq!(&bytes[..], b"\xFF\xD8jpeg");
    }

    #[tokio::test]
    async fn test_fetch_rejects_oversized_body() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/413"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 2048]))
            .mount(&mock_server)
            .await;

        let fetcher = create_test_fetcher(&mock_server, Duration::from_secs(5)).with_max_size(1024);
        let result = fetcher.fetch(&key("413")).await;
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_fetch_accepts_body_at_limit() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/200"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![7u8; 1024]))
            .mount(&mock_server)
            .await;

        let fetcher = create_test_fetcher(&mock_server, Duration::from_secs(5)).with_max_size(1024);
        let bytes = fetcher.fetch(&key("200")).await.unwrap();
        assert_eq!(bytes.len(), 1024);
    }

    #[tokio::test]
    async fn test_fetch_not_found() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/999"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let fetcher = create_test_fetcher(&mock_server, Duration::from_secs(5));
        let result = fetcher.fetch(&key("999")).await;
        assert_eq!(result, Err(FetchError::NotFound("999".to_string())));
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_unavailable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/500"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let fetcher = create_test_fetcher(&mock_server, Duration::from_secs(5));
        let result = fetcher.fetch(&key("500")).await;
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_unavailable() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/504"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
            .mount(&mock_server)
            .await;

        let fetcher = create_test_fetcher(&mock_server, Duration::from_millis(100));
        let result = fetcher.fetch(&key("504")).await;
        assert!(matches!(result, Err(FetchError::Unavailable(msg)) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_is_unavailable() {
        // Nothing listens on port 9 on a test host
        let fetcher = HttpCatFetcher::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = fetcher.fetch(&key("200")).await;
        assert!(matches!(result, Err(FetchError::Unavailable(_))));
    }
}
