//! Output module for Sumi-Linkcheck
//!
//! This module handles everything the crawler reports back to the user:
//!
//! - `Reporter`: the sink for progress, warnings and errors
//! - `TracingReporter`: the default sink, writing through `tracing`
//! - `CrawlStats` / `CrawlSummary`: run counters and end-of-run totals

mod reporter;
mod stats;

pub use reporter::{Reporter, TracingReporter};
pub use stats::{report_summary, CrawlStats, CrawlSummary};
