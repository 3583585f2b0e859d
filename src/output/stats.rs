//! Run statistics and the end-of-run summary

use crate::output::Reporter;
use std::time::Duration;

/// Counters accumulated during a crawl
///
/// Only the coordinator mutates these, between batches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// HTML pages fetched and parsed
    pub pages_crawled: u64,

    /// External hrefs probed
    pub external_checked: u64,

    /// External hrefs that failed validation
    pub broken_links: u64,

    /// Internal pages whose fetch failed
    pub pages_failed: u64,

    /// Internal resources that were not HTML
    pub pages_skipped: u64,

    /// Jobs dropped for exceeding the depth limit
    pub depth_dropped: u64,
}

/// Outcome of a complete crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    /// Origin the crawl started from
    pub origin: String,

    /// Final counters
    pub stats: CrawlStats,

    /// Wall-clock duration of the run
    pub elapsed: Duration,

    /// True if the page cap stopped the run with work still pending
    pub page_cap_reached: bool,
}

impl CrawlSummary {
    /// Returns the summary lines printed at the end of a run
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Pages crawled: {}", self.stats.pages_crawled),
            format!("External hrefs checked: {}", self.stats.external_checked),
            format!("Broken external hrefs: {}", self.stats.broken_links),
            format!("Failed pages: {}", self.stats.pages_failed),
            format!("Crawling duration: {:.2}s", self.elapsed.as_secs_f64()),
        ]
    }
}

/// Reports the end-of-run totals through `reporter`
pub fn report_summary(summary: &CrawlSummary, reporter: &dyn Reporter) {
    for line in summary.lines() {
        reporter.info(&line);
    }
}
