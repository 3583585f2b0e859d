//! Breadth-first frontier of pending crawl jobs
//!
//! This module handles:
//! - FIFO ordering of internal pages to fetch
//! - Discovery-time deduplication of internal addresses
//! - Dropping jobs past the depth limit before they are dispatched

use crate::state::{JobState, VisitedSet};
use crate::CrawlError;
use std::collections::VecDeque;
use url::Url;

/// An internal page waiting to be fetched
///
/// Target, parent and depth are fixed at discovery. Only the lifecycle
/// state moves, and only through [`CrawlJob::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlJob {
    /// The address to fetch
    pub target: Url,

    /// The page the address was found on (`None` for the origin)
    pub parent: Option<Url>,

    /// Distance in links from the origin
    pub depth: u32,

    state: JobState,
}

impl CrawlJob {
    fn discovered(target: Url, parent: Option<Url>, depth: u32) -> Self {
        Self {
            target,
            parent,
            depth,
            state: JobState::Discovered,
        }
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> JobState {
        self.state
    }

    /// Moves the job to `next`
    ///
    /// # Errors
    ///
    /// Returns `CrawlError::InvalidTransition` if `next` cannot follow the
    /// current state; the job is left unchanged.
    pub fn advance(&mut self, next: JobState) -> Result<JobState, CrawlError> {
        self.state = self.state.transition(next)?;
        Ok(self.state)
    }
}

/// Jobs removed from the frontier head in one step
#[derive(Debug, Default)]
pub struct Batch {
    /// Jobs to fetch, still `Enqueued`
    pub jobs: Vec<CrawlJob>,

    /// Jobs deeper than the depth limit, already `DepthExceeded`
    pub too_deep: Vec<CrawlJob>,
}

/// Frontier manages the pending-work queue and the internal visited set
///
/// Every address is inserted into the visited set at the moment it is
/// discovered, before it is ever fetched, so an address reached from several
/// pages of the same batch is still enqueued only once.
#[derive(Debug)]
pub struct Frontier {
    /// Pending jobs, oldest first
    queue: VecDeque<CrawlJob>,

    /// Every address ever enqueued
    visited: VisitedSet,

    /// Jobs deeper than this are dropped at dispatch
    max_depth: u32,
}

impl Frontier {
    /// Creates a frontier seeded with the origin at depth 0
    pub fn new(origin: Url, max_depth: u32) -> Result<Self, CrawlError> {
        let mut frontier = Self {
            queue: VecDeque::new(),
            visited: VisitedSet::new(),
            max_depth,
        };
        frontier.enqueue(CrawlJob::discovered(origin, None, 0))?;
        Ok(frontier)
    }

    /// Records an address found on `parent`
    ///
    /// Returns true if the address was new and a job at `parent_depth + 1`
    /// was appended to the tail.
    pub fn discover(
        &mut self,
        target: Url,
        parent: &Url,
        parent_depth: u32,
    ) -> Result<bool, CrawlError> {
        self.enqueue(CrawlJob::discovered(
            target,
            Some(parent.clone()),
            parent_depth + 1,
        ))
    }

    fn enqueue(&mut self, mut job: CrawlJob) -> Result<bool, CrawlError> {
        if !self.visited.claim(job.target.as_str()) {
            return Ok(false);
        }

        job.advance(JobState::Enqueued)?;
        self.queue.push_back(job);
        Ok(true)
    }

    /// Removes up to `limit` dispatchable jobs from the head
    ///
    /// Jobs past the depth limit are removed as well, moved to
    /// `DepthExceeded` and returned separately. They do not count against
    /// `limit`.
    pub fn next_batch(&mut self, limit: usize) -> Result<Batch, CrawlError> {
        let mut batch = Batch::default();

        while batch.jobs.len() < limit {
            let mut job = match self.queue.pop_front() {
                Some(job) => job,
                None => break,
            };

            if job.depth > self.max_depth {
                job.advance(JobState::DepthExceeded)?;
                batch.too_deep.push(job);
            } else {
                batch.jobs.push(job);
            }
        }

        Ok(batch)
    }

    /// Returns the number of pending jobs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns true if no job is pending
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the number of addresses ever enqueued
    pub fn discovered(&self) -> usize {
        self.visited.claimed()
    }
}
