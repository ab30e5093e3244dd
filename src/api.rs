//! News provider access.
//!
//! The fetch logic only needs one capability: "given a request mode and its
//! parameter, return articles or fail". That capability is the
//! [`NewsSource`] trait, so the controller can be driven by a fake in tests.
//!
//! # Architecture
//!
//! - [`NewsRequest`]: which endpoint to hit and with what parameter
//! - [`NewsSource`]: async capability trait
//! - [`NewsApiClient`]: reqwest implementation against NewsAPI
//!
//! # Endpoints
//!
//! ```text
//! GET {base}/v2/everything?q={query}&apiKey={key}
//! GET {base}/v2/top-headlines?country={country}&apiKey={key}
//! ```
//!
//! No retries and no timeout beyond the reqwest defaults.

use crate::error::FetchError;
use crate::models::{Article, NewsResponse, ProviderError};
use crate::utils::truncate_for_log;
use std::fmt;
use std::time::Instant;
use tracing::{debug, info, instrument, warn};
use url::Url;

/// Search term used when the primary request comes back empty.
pub const FALLBACK_QUERY: &str = "latest";

/// Default provider base URL.
pub const DEFAULT_BASE_URL: &str = "https://newsapi.org/";

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// One outbound request shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsRequest {
    /// Full-text search across all indexed articles.
    Search { query: String },
    /// Top stories for a country.
    Headlines { country: String },
}

impl NewsRequest {
    /// Pick the request mode for the current UI state.
    ///
    /// A non-empty query always wins over the country.
    pub fn for_state(query: &str, country: &str) -> Self {
        if query.is_empty() {
            NewsRequest::Headlines {
                country: country.to_string(),
            }
        } else {
            NewsRequest::Search {
                query: query.to_string(),
            }
        }
    }

    /// The global search issued when a primary request yields nothing.
    pub fn fallback() -> Self {
        NewsRequest::Search {
            query: FALLBACK_QUERY.to_string(),
        }
    }

    /// Endpoint path, relative to the provider base.
    pub fn endpoint(&self) -> &'static str {
        match self {
            NewsRequest::Search { .. } => "v2/everything",
            NewsRequest::Headlines { .. } => "v2/top-headlines",
        }
    }

    /// The single query parameter that parameterizes this request.
    pub fn param(&self) -> (&'static str, &str) {
        match self {
            NewsRequest::Search { query } => ("q", query.as_str()),
            NewsRequest::Headlines { country } => ("country", country.as_str()),
        }
    }
}

impl fmt::Display for NewsRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (key, value) = self.param();
        write!(f, "{}?{}={}", self.endpoint(), key, value)
    }
}

/// Capability to resolve a [`NewsRequest`] into articles.
pub trait NewsSource {
    /// Issue the request and return its article list (possibly empty).
    ///
    /// Network failures, non-success statuses and malformed payloads are all
    /// errors.
    async fn fetch(&self, request: &NewsRequest) -> Result<Vec<Article>, FetchError>;
}

/// [`NewsSource`] backed by the NewsAPI HTTP service.
#[derive(Clone)]
pub struct NewsApiClient {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
}

impl NewsApiClient {
    /// Create a client for `base_url` authenticating with `api_key`.
    ///
    /// The underlying reqwest client sends a `global_news/<version>`
    /// User-Agent; NewsAPI rejects requests without one.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Provider root; must end in `/` for endpoint paths to
    ///   resolve beneath it (see [`crate::config::parse_base_url`])
    /// * `api_key` - NewsAPI key, sent as the `apiKey` query parameter
    ///
    /// # Returns
    ///
    /// The client, or [`FetchError::Transport`] if the TLS backend cannot be
    /// initialised.
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self::with_http_client(http, base_url, api_key))
    }

    /// Create a client around an already configured reqwest client.
    ///
    /// # Arguments
    ///
    /// * `http` - Client used as-is; no User-Agent is added
    /// * `base_url` - Provider root, as for [`Self::new`]
    /// * `api_key` - NewsAPI key
    pub fn with_http_client(
        http: reqwest::Client,
        base_url: Url,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url,
            api_key: api_key.into(),
        }
    }

    /// Build the full request URL, credential included.
    ///
    /// The request's parameter comes first, then `apiKey`. Both values are
    /// percent-encoded.
    ///
    /// # Returns
    ///
    /// The absolute URL, or [`FetchError::Url`] if the endpoint cannot be
    /// joined onto the base.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// let url = client.request_url(&NewsRequest::for_state("", "jp"))?;
    /// assert_eq!(url.path(), "/v2/top-headlines");
    /// ```
    ///
    /// Never log the result as-is; it contains the key.
    pub fn request_url(&self, request: &NewsRequest) -> Result<Url, FetchError> {
        let mut url = self.base_url.join(request.endpoint())?;
        let (key, value) = request.param();
        url.query_pairs_mut()
            .append_pair(key, value)
            .append_pair("apiKey", &self.api_key);
        Ok(url)
    }
}

impl fmt::Debug for NewsApiClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewsApiClient")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl NewsSource for NewsApiClient {
    #[instrument(level = "info", skip_all, fields(request = %request))]
    async fn fetch(&self, request: &NewsRequest) -> Result<Vec<Article>, FetchError> {
        let t0 = Instant::now();
        let url = self.request_url(request)?;
        debug!(base = %self.base_url, endpoint = request.endpoint(), "Sending request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        let dt = t0.elapsed();

        if !status.is_success() {
            let provider = serde_json::from_str::<ProviderError>(&body).ok();
            let code = provider.as_ref().and_then(|e| e.code.clone());
            let message = provider
                .and_then(|e| e.message)
                .unwrap_or_else(|| truncate_for_log(&body, 200));
            warn!(
                status = status.as_u16(),
                code = code.as_deref().unwrap_or("unknown"),
                elapsed_ms = dt.as_millis() as u64,
                %message,
                "Provider returned error status"
            );
            return Err(FetchError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = serde_json::from_str::<NewsResponse>(&body).map_err(|e| {
            warn!(
                error = %e,
                body_preview = %truncate_for_log(&body, 300),
                "Provider returned a malformed payload"
            );
            e
        })?;

        info!(
            count = parsed.articles.len(),
            elapsed_ms = dt.as_millis() as u64,
            "Fetched articles"
        );
        Ok(parsed.articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn client(base: &str) -> NewsApiClient {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .no_proxy()
            .build()
            .unwrap();
        NewsApiClient::with_http_client(http, Url::parse(base).unwrap(), "test-key")
    }

    /// Serve exactly one HTTP response and hand back the raw request text.
    async fn serve_once(status_line: &'static str, body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut received = Vec::new();
            let mut buf = [0u8; 4096];
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                received.extend_from_slice(&buf[..n]);
                if received.windows(4).any(|w| w == b"\r\n\r\n") {
                    break;
                }
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            let _ = socket.shutdown().await;
            String::from_utf8_lossy(&received).into_owned()
        });
        (format!("http://{addr}/"), handle)
    }

    #[test]
    fn test_request_mode_selection() {
        assert_eq!(
            NewsRequest::for_state("", "jp"),
            NewsRequest::Headlines {
                country: "jp".to_string()
            }
        );
        assert_eq!(
            NewsRequest::for_state("election", "jp"),
            NewsRequest::Search {
                query: "election".to_string()
            }
        );
    }

    #[test]
    fn test_every_selector_country_builds_headlines_request() {
        for (code, _) in crate::models::COUNTRIES {
            let request = NewsRequest::for_state("", code);
            assert_eq!(request.endpoint(), "v2/top-headlines");
            assert_eq!(request.param(), ("country", code));
        }
    }

    #[test]
    fn test_fallback_request() {
        let request = NewsRequest::fallback();
        assert_eq!(request.endpoint(), "v2/everything");
        assert_eq!(request.param(), ("q", "latest"));
        assert_eq!(request.to_string(), "v2/everything?q=latest");
    }

    #[test]
    fn test_request_url_headlines() {
        let url = client("https://newsapi.org/")
            .request_url(&NewsRequest::for_state("", "us"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/top-headlines?country=us&apiKey=test-key"
        );
    }

    #[test]
    fn test_request_url_search_is_encoded() {
        let url = client("https://newsapi.org/")
            .request_url(&NewsRequest::for_state("rust & go", "us"))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://newsapi.org/v2/everything?q=rust+%26+go&apiKey=test-key"
        );
    }

    #[test]
    fn test_request_url_keeps_base_path() {
        let url = client("http://localhost:8080/proxy/")
            .request_url(&NewsRequest::fallback())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8080/proxy/v2/everything?q=latest&apiKey=test-key"
        );
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let rendered = format!("{:?}", client("https://newsapi.org/"));
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let body = r#"{"status":"ok","totalResults":2,"articles":[
            {"title":"One","description":"First","url":"https://example.com/1","urlToImage":null},
            {"title":"Two","description":null,"url":"https://example.com/2","urlToImage":"https://example.com/2.jpg"}
        ]}"#;
        let (base, server) = serve_once("200 OK", body.to_string()).await;

        let articles = client(&base)
            .fetch(&NewsRequest::for_state("", "jp"))
            .await
            .unwrap();
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "One");
        assert_eq!(articles[1].image(), Some("https://example.com/2.jpg"));

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /v2/top-headlines?country=jp&apiKey=test-key HTTP/1.1"));
        assert!(request.to_lowercase().contains("user-agent: global_news/"));
    }

    #[tokio::test]
    async fn test_fetch_error_status_uses_provider_message() {
        let body = r#"{"status":"error","code":"apiKeyInvalid","message":"Your API key is invalid."}"#;
        let (base, server) = serve_once("401 Unauthorized", body.to_string()).await;

        let err = client(&base)
            .fetch(&NewsRequest::fallback())
            .await
            .unwrap_err();
        match err {
            FetchError::Status { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Your API key is invalid.");
            }
            other => panic!("unexpected error: {other}"),
        }
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_malformed_payload() {
        let (base, server) = serve_once("200 OK", r#"{"status":"ok"}"#.to_string()).await;

        let err = client(&base)
            .fetch(&NewsRequest::fallback())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Bind then drop to get a port nothing listens on.
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{addr}/"))
            .fetch(&NewsRequest::fallback())
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Transport(_)));
    }

    #[tokio::test]
    async fn test_transport_error_hides_api_key() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let http = reqwest::Client::builder().no_proxy().build().unwrap();
        let client = NewsApiClient::with_http_client(
            http,
            Url::parse(&format!("http://{addr}/")).unwrap(),
            "SECRET-KEY-123",
        );
        let err = client.fetch(&NewsRequest::fallback()).await.unwrap_err();

        assert!(matches!(err, FetchError::Transport(_)));
        assert!(!format!("{err}").contains("SECRET-KEY-123"));
        assert!(!format!("{err:?}").contains("SECRET-KEY-123"));
    }
}
