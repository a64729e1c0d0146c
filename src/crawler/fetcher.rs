//! HTTP fetcher implementation
//!
//! Every request carries the same header set (user agent, and optionally
//! accept and referer). A response counts as usable only when its status is
//! successful and its body is at least `min-body-length` bytes long; shorter
//! bodies are anti-bot block pages and must not be parsed.

use crate::config::HttpConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, REFERER};
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

/// Ways a fetch can fail
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP {status} for {url}")]
    Status { url: String, status: StatusCode },

    #[error("Blocked or empty response for {url}: {length} bytes (minimum {minimum})")]
    BlockedContent {
        url: String,
        length: usize,
        minimum: usize,
    },

    #[error("Request to {url} failed: {source}")]
    Network { url: String, source: reqwest::Error },
}

/// Builds an HTTP client with the fixed header set
///
/// # Example
///
/// ```no_run
/// use reel_harvest::config::HttpConfig;
/// use reel_harvest::crawler::build_http_client;
///
/// let config = HttpConfig {
///     user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
///     accept: None,
///     referer: Some("https://google.com/".to_string()),
///     min_body_length: 1000,
///     timeout_secs: 30,
/// };
///
/// let client = build_http_client(&config).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    if let Some(accept) = config.accept.as_deref() {
        if let Ok(value) = HeaderValue::from_str(accept) {
            headers.insert(ACCEPT, value);
        }
    }
    if let Some(referer) = config.referer.as_deref() {
        if let Ok(value) = HeaderValue::from_str(referer) {
            headers.insert(REFERER, value);
        }
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Issues GET requests and classifies block pages
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    min_body_length: usize,
}

impl Fetcher {
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            min_body_length: config.min_body_length,
        })
    }

    /// Fetches `url` and returns its markup
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The response body, at least `min-body-length` bytes
    /// * `Err(FetchError::Status)` - Non-success status code
    /// * `Err(FetchError::BlockedContent)` - Body shorter than the threshold
    /// * `Err(FetchError::Network)` - Connection, timeout or body read failure
    pub async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        tracing::debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Network {
            url: url.to_string(),
            source,
        })?;

        if body.len() < self.min_body_length {
            return Err(FetchError::BlockedContent {
                url: url.to_string(),
                length: body.len(),
                minimum: self.min_body_length,
            });
        }

        Ok(body)
    }
}
