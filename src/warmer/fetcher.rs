//! HTTP fetcher implementation
//!
//! This module handles the page requests that actually warm the cache:
//! - Building the shared HTTP client with a proper user agent string
//! - Single GET requests, without retry
//! - Error classification into [`ErrorKind`]

use crate::config::UserAgentConfig;
use crate::sitemap::TargetUrl;
use reqwest::Client;
use std::fmt;
use std::time::{Duration, Instant};

/// Why a single page fetch failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// Transport-level failure (DNS, connection refused, TLS, body read)
    Network(String),

    /// The request did not complete within the client timeout
    Timeout,

    /// The server answered with a non-success status
    HttpStatus(u16),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Network(error) => write!(f, "network error: {}", error),
            ErrorKind::Timeout => write!(f, "request timeout"),
            ErrorKind::HttpStatus(code) => write!(f, "HTTP {}", code),
        }
    }
}

/// Result of fetching one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    /// The URL that was requested
    pub url: TargetUrl,

    /// Response body length in bytes (0 on failure)
    pub byte_size: u64,

    /// Wall-clock time of the request/response cycle
    pub elapsed: Duration,

    /// Set when the fetch failed
    pub error: Option<ErrorKind>,
}

impl FetchOutcome {
    /// Creates a successful outcome
    pub fn success(url: impl Into<TargetUrl>, byte_size: u64, elapsed: Duration) -> Self {
        Self {
            url: url.into(),
            byte_size,
            elapsed,
            error: None,
        }
    }

    /// Creates a failed outcome
    pub fn failure(url: impl Into<TargetUrl>, elapsed: Duration, error: ErrorKind) -> Self {
        Self {
            url: url.into(),
            byte_size: 0,
            elapsed,
            error: Some(error),
        }
    }

    /// Returns true if the page was fetched successfully
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Per-request timeout
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use warmupcache::config::UserAgentConfig;
/// use warmupcache::warmer::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a single page
///
/// Issues one GET and reads the full body so the downstream cache sees a
/// complete response. Failures are classified into the outcome; this function
/// never returns an error.
///
/// | Condition | Outcome |
/// |-----------|---------|
/// | 2xx | success, body length |
/// | non-2xx | `HttpStatus(code)` |
/// | Timeout | `Timeout` |
/// | Anything else | `Network(message)` |
pub async fn fetch_url(client: &Client, url: TargetUrl) -> FetchOutcome {
    tracing::debug!("Get {}", url);
    let start = Instant::now();

    let response = match client.get(url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            let kind = classify_error(&e);
            tracing::debug!("Fetch of {} failed: {}", url, kind);
            return FetchOutcome::failure(url, start.elapsed(), kind);
        }
    };

    let status = response.status();
    if !status.is_success() {
        // Drain the body so the connection can be reused
        let _ = response.bytes().await;
        tracing::debug!("Fetch of {} returned HTTP {}", url, status.as_u16());
        return FetchOutcome::failure(url, start.elapsed(), ErrorKind::HttpStatus(status.as_u16()));
    }

    match response.bytes().await {
        Ok(body) => FetchOutcome::success(url, body.len() as u64, start.elapsed()),
        Err(e) => {
            let kind = classify_error(&e);
            tracing::debug!("Reading body of {} failed: {}", url, kind);
            FetchOutcome::failure(url, start.elapsed(), kind)
        }
    }
}

/// Maps a transport error onto an [`ErrorKind`]
fn classify_error(error: &reqwest::Error) -> ErrorKind {
    if error.is_timeout() {
        ErrorKind::Timeout
    } else if error.is_connect() {
        // DNS, refused connections and TLS handshakes all land here
        ErrorKind::Network(root_cause(error))
    } else {
        ErrorKind::Network(error.to_string())
    }
}

/// Message of the innermost error in the source chain
fn root_cause(error: &(dyn std::error::Error + 'static)) -> String {
    let mut cause = error;
    while let Some(source) = cause.source() {
        cause = source;
    }
    cause.to_string()
}
