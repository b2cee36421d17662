//! Page retrieval over HTTP
//!
//! The fetcher is the only component that talks to the remote resource. It
//! knows nothing about caching or counting.

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tracing::{debug, warn};

use crate::identifier::Identifier;

/// Errors that can occur when fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// Connection, TLS or body read failure
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },
}

/// Retrieves the content behind an identifier
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, id: &Identifier) -> Result<String, FetchError>;
}

/// Fetches pages with a single HTTP GET, body decoded as text
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    /// HTTP client for making requests
    http_client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default client (transport-default timeouts, no retries)
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher around an already configured client
    pub fn with_client(http_client: Client) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, id: &Identifier) -> Result<String, FetchError> {
        let response = self.http_client.get(id.as_str()).send().await.map_err(|e| {
            warn!(url = %id, error = %e, "Fetch failed");
            FetchError::Request(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %id, status = status.as_u16(), "Fetch returned error status");
            return Err(FetchError::Status {
                url: id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!(url = %id, bytes = body.len(), "Fetched page");
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn id_for(server: &MockServer, route: &str) -> Identifier {
        Identifier::parse(&format!("{}{}", server.uri(), route)).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_returns_body_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/a"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>X</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let body = HttpFetcher::new().fetch(&id_for(&server, "/a")).await.unwrap();
        assert_eq!(body, "<html>X</html>");
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&server)
            .await;

        let err = HttpFetcher::new()
            .fetch(&id_for(&server, "/missing"))
            .await
            .unwrap_err();

        match err {
            FetchError::Status { status, url } => {
                assert_eq!(status, 404);
                assert!(url.ends_with("/missing"));
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_server_error_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = HttpFetcher::new().fetch(&id_for(&server, "/busy")).await.unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_request_error() {
        // Nothing listens on port 1
        let id = Identifier::parse("http://127.0.0.1:1/a").unwrap();
        let err = HttpFetcher::new().fetch(&id).await.unwrap_err();
        assert!(matches!(err, FetchError::Request(_)));
    }
}
