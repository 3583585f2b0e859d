//! HTTP fetcher implementation
//!
//! This module handles page retrieval for the crawler, including:
//! - Building the shared HTTP client
//! - GET requests with a per-request timeout
//! - Classifying responses into HTML, non-HTML and failures

use crate::config::HttpConfig;
use reqwest::{header::CONTENT_TYPE, redirect::Policy, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Time allowed to establish a TCP/TLS connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// An HTML page; carries the body
    Html(String),

    /// The resource exists but is not an HTML page (images, PDFs, ...)
    NonHtmlSuccess,

    /// Dead page, server error, network error or timeout
    Failure(String),
}

/// Builds the HTTP client shared by the fetcher and the link validator
///
/// Redirects are never followed automatically: the fetcher reports redirect
/// responses as they are and the validator follows 301s itself.
///
/// # Example
///
/// ```no_run
/// use sumi_linkcheck::config::HttpConfig;
/// use sumi_linkcheck::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .connect_timeout(CONNECT_TIMEOUT)
        .redirect(Policy::none())
        .gzip(true)
        .brotli(true)
        .build()
}

/// Returns true for the status codes treated as a dead resource
///
/// Only 404, 410 and the 5xx range count. Other 4xx codes are too often
/// returned by live resources (auth walls, bot filters) to be trusted.
pub fn is_dead_status(status: StatusCode) -> bool {
    status == StatusCode::NOT_FOUND || status == StatusCode::GONE || status.is_server_error()
}

/// Formats a status as `"<code>: <reason>"`, e.g. `"410: Gone"`
pub fn status_line(status: StatusCode) -> String {
    format!(
        "{}: {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Status")
    )
}

/// Describes a request error the way it is reported to the user
pub(crate) fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    }
}

/// Fetches pages for the crawler
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher using `client` and a per-request `timeout`
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetches a URL and classifies the response
    ///
    /// # Classification
    ///
    /// | Response | Outcome |
    /// |----------|---------|
    /// | 404, 410, 5xx | `Failure("<code>: <reason>")` |
    /// | 2xx/3xx with `text/html` content type | `Html(body)` |
    /// | anything else | `NonHtmlSuccess` |
    /// | timeout | `Failure("timeout")` |
    /// | network error | `Failure(<cause>)` |
    ///
    /// The timeout covers the whole exchange, body included. The response is
    /// dropped on every return path, which hands its connection back to the
    /// pool or closes it when the body was not read to the end.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        let response = match self
            .client
            .get(url.as_str())
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return FetchOutcome::Failure(describe_error(&e)),
        };

        let status = response.status();

        if is_dead_status(status) {
            return FetchOutcome::Failure(status_line(status));
        }

        if !(status.is_success() || status.is_redirection()) || !is_html(&response) {
            tracing::trace!("{} answered {} without HTML", url, status);
            return FetchOutcome::NonHtmlSuccess;
        }

        match response.text().await {
            Ok(body) => FetchOutcome::Html(body),
            Err(e) => FetchOutcome::Failure(describe_error(&e)),
        }
    }
}

fn is_html(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_ascii_lowercase().contains("text/html"))
        .unwrap_or(false)
}
