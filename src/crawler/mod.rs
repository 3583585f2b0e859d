//! Crawler module for page fetching and link checking
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching of internal pages
//! - Anchor href extraction from HTML
//! - Breadth-first frontier management
//! - HEAD validation of external links
//! - Overall crawl coordination

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod validator;

pub use coordinator::{run_crawl, Coordinator};
pub use extractor::extract_hrefs;
pub use fetcher::{build_http_client, is_dead_status, status_line, FetchOutcome, Fetcher};
pub use frontier::{CrawlJob, Frontier};
pub use validator::{LinkValidator, ValidationOutcome, MAX_REDIRECTS};

use crate::config::Config;
use crate::output::{CrawlSummary, TracingReporter};
use crate::CrawlError;
use std::sync::Arc;

/// Runs a complete crawl, reporting through `tracing`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the origin and configuration
/// 2. Build the HTTP client
/// 3. Crawl same-host pages breadth-first
/// 4. Validate every distinct external link once
/// 5. Log the summary
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `origin` - Absolute http(s) address to start from
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(CrawlError)` - Invalid origin or configuration
pub async fn crawl(config: Config, origin: &str) -> Result<CrawlSummary, CrawlError> {
    run_crawl(config, origin, Arc::new(TracingReporter)).await
}
