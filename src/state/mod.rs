//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `JobState`: lifecycle of a single crawl job (discovered, enqueued, fetching, parsed, ...)
//! - `VisitedSet`: discovery-time deduplication of internal addresses and external hrefs

mod job_state;
mod visited;

// Re-export main types
pub use job_state::JobState;
pub use visited::VisitedSet;
