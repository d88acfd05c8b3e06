use super::types::{CategoriesResponse, NewsResponse};
use futures::StreamExt;
use reqwest::redirect::Policy;
use std::time::Duration;
use thiserror::Error;
use url::Url;

const MAX_RESPONSE_SIZE: usize = 5 * 1024 * 1024; // 5MB

const CATEGORIES_PATH: &str = "api/categories";
const NEWS_PATH: &str = "api/news";

/// Errors raised while talking to the news backend.
///
/// A `success: false` envelope is *not* an error at this layer; it is a
/// well-formed answer and is returned as `Ok(NewsResponse)`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request timed out after {0}s")]
    Timeout(u64),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    #[error("Response too large (exceeds {0} bytes)")]
    ResponseTooLarge(usize),
    #[error("Invalid UTF-8 in response")]
    InvalidUtf8,
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Redirect policy: at most 3 hops, no loops.
fn create_redirect_policy() -> Policy {
    Policy::custom(|attempt| {
        if attempt.previous().len() >= 3 {
            return attempt.error("Too many redirects (max 3)");
        }

        let url = attempt.url();
        for prev in attempt.previous() {
            if prev.as_str() == url.as_str() {
                return attempt.error("Redirect loop detected");
            }
        }

        tracing::debug!(
            from = %attempt.previous().last().map(|u| u.as_str()).unwrap_or("initial"),
            to = %url,
            hop = attempt.previous().len() + 1,
            "Following redirect"
        );

        attempt.follow()
    })
}

/// Parse and normalize the backend base URL.
///
/// Only http/https are accepted. The path always ends in `/` so endpoint
/// paths join beneath it rather than replacing its last segment.
pub fn parse_base_url(base_url: &str) -> Result<Url, ApiError> {
    let mut url = Url::parse(base_url.trim())
        .map_err(|e| ApiError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(ApiError::InvalidBaseUrl(format!(
                "unsupported scheme '{}' (only http/https allowed)",
                scheme
            )))
        }
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// HTTP client for the two read-only dashboard endpoints.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference-counted,
/// so background tasks take their own copy.
#[derive(Debug, Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl NewsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let base_url = parse_base_url(base_url)?;

        let http = reqwest::Client::builder()
            .redirect(create_redirect_policy())
            .pool_max_idle_per_host(2)
            .pool_idle_timeout(Duration::from_secs(30))
            .tcp_keepalive(Duration::from_secs(60))
            .user_agent(concat!("newsdash/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))
    }

    /// `GET /api/categories`.
    ///
    /// Any non-2xx status is an error; the categories endpoint has no
    /// failure envelope.
    pub async fn fetch_categories(&self) -> Result<Vec<String>, ApiError> {
        let url = self.endpoint(CATEGORIES_PATH)?;
        let (status, body) = self.get(url).await?;

        if !(200..300).contains(&status) {
            return Err(ApiError::HttpStatus(status));
        }

        let parsed: CategoriesResponse = serde_json::from_str(&body)?;
        tracing::debug!(count = parsed.categories.len(), "Loaded categories");
        Ok(parsed.categories)
    }

    /// `GET /api/news`.
    ///
    /// The backend reports its own failures as HTTP 500 with a
    /// `{"success": false, "error": ...}` body, so a parseable envelope is
    /// returned whatever the status. Only an unparseable non-2xx body
    /// becomes `ApiError::HttpStatus`.
    pub async fn fetch_news(&self) -> Result<NewsResponse, ApiError> {
        let url = self.endpoint(NEWS_PATH)?;
        let (status, body) = self.get(url).await?;

        match serde_json::from_str::<NewsResponse>(&body) {
            Ok(envelope) => {
                tracing::debug!(
                    status,
                    success = envelope.success,
                    articles = envelope.articles.as_ref().map_or(0, Vec::len),
                    "Received news envelope"
                );
                Ok(envelope)
            }
            Err(_) if !(200..300).contains(&status) => Err(ApiError::HttpStatus(status)),
            Err(e) => Err(ApiError::Malformed(e)),
        }
    }

    async fn get(&self, url: Url) -> Result<(u16, String), ApiError> {
        tracing::debug!(url = %url, "GET");
        let response = tokio::time::timeout(self.timeout, self.http.get(url).send())
            .await
            .map_err(|_| ApiError::Timeout(self.timeout.as_secs()))??;

        let status = response.status().as_u16();
        let body = tokio::time::timeout(
            self.timeout,
            read_limited_text(response, MAX_RESPONSE_SIZE),
        )
        .await
        .map_err(|_| ApiError::Timeout(self.timeout.as_secs()))??;

        Ok((status, body))
    }
}

async fn read_limited_text(response: reqwest::Response, limit: usize) -> Result<String, ApiError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(ApiError::ResponseTooLarge(limit));
        }
        bytes.extend_from_slice(&chunk);
    }

    String::from_utf8(bytes).map_err(|_| ApiError::InvalidUtf8)
}
