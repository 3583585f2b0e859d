//! External link validation
//!
//! Links pointing off-host are never crawled, only probed with a HEAD request.
//! The classification is deliberately narrow: servers routinely answer HEAD
//! probes with 403, 405 or LinkedIn's 999 while the page opens fine in a
//! browser, so only explicit dead/error codes mark a link as broken.

use crate::crawler::fetcher::{describe_error, is_dead_status, status_line};
use reqwest::{header::LOCATION, Client, StatusCode};
use std::time::Duration;
use url::Url;

/// Maximum number of 301 hops followed before a link is declared broken
pub const MAX_REDIRECTS: u32 = 5;

/// Result of probing a link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationOutcome {
    pub valid: bool,
    pub reason: Option<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// Probes external links
#[derive(Debug, Clone)]
pub struct LinkValidator {
    client: Client,
    timeout: Duration,
    max_redirects: u32,
}

impl LinkValidator {
    /// Creates a validator using `client` and a per-request `timeout`
    ///
    /// `client` must not follow redirects on its own.
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            max_redirects: MAX_REDIRECTS,
        }
    }

    /// Checks whether `url` is reachable
    ///
    /// # Classification
    ///
    /// | Response | Outcome |
    /// |----------|---------|
    /// | 404, 410, 5xx | invalid, reason = status line |
    /// | 301 | follow `Location`, at most 5 hops |
    /// | 301 after the last hop | invalid, "exceeded max redirections" |
    /// | 301 without usable `Location` | invalid |
    /// | anything else (403, 999, 302, ...) | valid |
    /// | timeout / network error | invalid, reason = cause |
    ///
    /// Each hop is a separate request with its own timeout.
    pub async fn validate(&self, url: &Url) -> ValidationOutcome {
        let mut current = url.clone();
        let mut hops = 0;

        loop {
            let response = match self
                .client
                .head(current.as_str())
                .timeout(self.timeout)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => return ValidationOutcome::invalid(describe_error(&e)),
            };

            let status = response.status();

            if is_dead_status(status) {
                return ValidationOutcome::invalid(status_line(status));
            }

            if status != StatusCode::MOVED_PERMANENTLY {
                return ValidationOutcome::valid();
            }

            if hops >= self.max_redirects {
                return ValidationOutcome::invalid("exceeded max redirections");
            }

            let location = match response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
            {
                Some(location) => location,
                None => return ValidationOutcome::invalid("301 without Location header"),
            };

            let next = match current.join(location) {
                Ok(next) => next,
                Err(e) => {
                    return ValidationOutcome::invalid(format!(
                        "invalid Location header '{}': {}",
                        location, e
                    ))
                }
            };

            hops += 1;
            tracing::debug!("Redirect {}/{}: {} -> {}", hops, self.max_redirects, current, next);
            current = next;
        }
    }
}
