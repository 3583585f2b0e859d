//! Job state definitions for tracking crawl progress
//!
//! Every crawl job walks `Discovered → Enqueued → Fetching` and ends in one of
//! the terminal states. Jobs past the depth limit leave the frontier as
//! `DepthExceeded` without ever being fetched.

use crate::CrawlError;
use std::fmt;

/// Represents the current state of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobState {
    // ===== Active States =====
    /// Address was found on a page
    Discovered,

    /// Job is waiting in the frontier
    Enqueued,

    /// Page is being fetched
    Fetching,

    // ===== Terminal States =====
    /// HTML page fetched, links extracted and expanded
    Parsed,

    /// Resource fetched successfully but it is not HTML
    Skipped,

    /// Fetch failed (dead page, server error, network error, timeout)
    Failed,

    /// Job is deeper than the crawl depth limit and was never fetched
    DepthExceeded,
}

impl JobState {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: JobState) -> bool {
        matches!(
            (self, next),
            (Self::Discovered, Self::Enqueued)
                | (Self::Enqueued, Self::Fetching)
                | (Self::Enqueued, Self::DepthExceeded)
                | (Self::Fetching, Self::Parsed)
                | (Self::Fetching, Self::Skipped)
                | (Self::Fetching, Self::Failed)
        )
    }

    /// Moves to `next`, rejecting illegal transitions
    pub fn transition(self, next: JobState) -> Result<JobState, CrawlError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(CrawlError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    /// Short lowercase name used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Discovered => "discovered",
            Self::Enqueued => "enqueued",
            Self::Fetching => "fetching",
            Self::Parsed => "parsed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
            Self::DepthExceeded => "depth_exceeded",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
