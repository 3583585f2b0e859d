//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Removing breadth-first batches from the frontier
//! - Fetching each batch concurrently
//! - Extracting and classifying links of every HTML page
//! - Validating new external links in bounded sub-batches
//! - Enqueueing new internal addresses
//!
//! All crawl state (frontier, visited sets, statistics) belongs to the
//! coordinator and is only touched between awaits on the coordinating task.
//! Concurrent requests borrow the fetcher and validator and hand their results
//! back, so no locking is needed.

use crate::config::{validate, Config, CrawlerConfig};
use crate::crawler::extractor::extract_hrefs;
use crate::crawler::fetcher::{build_http_client, FetchOutcome, Fetcher};
use crate::crawler::frontier::{CrawlJob, Frontier};
use crate::crawler::validator::{LinkValidator, ValidationOutcome};
use crate::output::{report_summary, CrawlStats, CrawlSummary, Reporter};
use crate::state::{JobState, VisitedSet};
use crate::url::{classify_hrefs, ClassifyPolicy, ExternalLink};
use crate::CrawlError;
use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: CrawlerConfig,
    policy: ClassifyPolicy,
    origin: Url,
    fetcher: Fetcher,
    validator: LinkValidator,
    reporter: Arc<dyn Reporter>,
    frontier: Frontier,
    external_visited: VisitedSet,
    stats: CrawlStats,
}

/// External links of one page that still need probing
struct PendingChecks {
    page: Url,
    links: Vec<ExternalLink>,
}

impl Coordinator {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `origin` - The page the crawl starts from (see [`crate::url::parse_origin`])
    /// * `reporter` - Where progress, warnings and errors are sent
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config, origin: Url, reporter: Arc<dyn Reporter>) -> Result<Self, CrawlError> {
        validate(&config)?;

        let client = build_http_client(&config.http)?;
        let fetcher = Fetcher::new(
            client.clone(),
            Duration::from_millis(config.http.fetch_timeout_ms),
        );
        let validator = LinkValidator::new(
            client,
            Duration::from_millis(config.http.validation_timeout_ms),
        );

        let frontier = Frontier::new(origin.clone(), config.crawler.max_crawling_depth)?;
        let policy = ClassifyPolicy {
            skip_self_links: config.crawler.skip_self_links,
        };

        Ok(Self {
            config: config.crawler,
            policy,
            origin,
            fetcher,
            validator,
            reporter,
            frontier,
            external_visited: VisitedSet::new(),
            stats: CrawlStats::default(),
        })
    }

    /// Runs the crawl until the frontier is empty or the page cap is reached
    ///
    /// Individual page and link failures never abort the run; they are
    /// reported and the crawl moves on. Only an illegal job state transition
    /// stops it.
    pub async fn run(&mut self) -> Result<CrawlSummary, CrawlError> {
        let start_time = Instant::now();
        self.reporter
            .info(&format!("Starting crawling at '{}'.", self.origin));

        while !self.frontier.is_empty() && self.stats.pages_crawled < self.config.max_pages {
            let remaining = self.config.max_pages - self.stats.pages_crawled;
            let limit = usize::try_from(remaining)
                .unwrap_or(usize::MAX)
                .min(self.config.max_concurrent_internal);

            let batch = self.frontier.next_batch(limit)?;

            for job in &batch.too_deep {
                self.record(job);
                self.reporter.debug(&format!(
                    "Not fetching '{}': depth {} exceeds {}",
                    job.target, job.depth, self.config.max_crawling_depth
                ));
            }

            if batch.jobs.is_empty() {
                continue;
            }

            self.reporter.debug(&format!(
                "Fetching batch of {} pages ({} pending, {} discovered)",
                batch.jobs.len(),
                self.frontier.len(),
                self.frontier.discovered()
            ));
            self.process_batch(batch.jobs).await?;
        }

        let page_cap_reached = !self.frontier.is_empty()
            && self.stats.pages_crawled >= self.config.max_pages;
        if page_cap_reached {
            self.reporter.info(&format!(
                "Reached the maximum of {} pages; {} pending pages were not crawled.",
                self.config.max_pages,
                self.frontier.len()
            ));
        }

        let summary = CrawlSummary {
            origin: self.origin.to_string(),
            stats: self.stats,
            elapsed: start_time.elapsed(),
            page_cap_reached,
        };
        report_summary(&summary, self.reporter.as_ref());
        Ok(summary)
    }

    /// Fetches one batch, expands its pages and validates their external links
    async fn process_batch(&mut self, mut jobs: Vec<CrawlJob>) -> Result<(), CrawlError> {
        for job in &mut jobs {
            job.advance(JobState::Fetching)?;
        }

        let fetcher = &self.fetcher;
        let outcomes = join_all(jobs.iter().map(|job| fetcher.fetch(&job.target))).await;

        let mut pending = Vec::new();
        for (job, outcome) in jobs.into_iter().zip(outcomes) {
            if let Some(checks) = self.handle_outcome(job, outcome)? {
                pending.push(checks);
            }
        }

        if pending.is_empty() {
            return Ok(());
        }

        let validator = &self.validator;
        let ceiling = self.config.max_concurrent_external;
        let results = join_all(
            pending
                .iter()
                .map(|checks| validate_links(validator, &checks.links, ceiling)),
        )
        .await;

        for (checks, outcomes) in pending.iter().zip(results) {
            for (link, outcome) in checks.links.iter().zip(outcomes) {
                self.stats.external_checked += 1;
                if !outcome.valid {
                    self.stats.broken_links += 1;
                    let reason = outcome.reason.as_deref().unwrap_or("unknown");
                    self.reporter.warn(&link.href, checks.page.as_str(), reason);
                }
            }
        }
        Ok(())
    }

    /// Applies one fetch outcome to the crawl state
    ///
    /// Returns the page's new external links when there are any to validate.
    fn handle_outcome(
        &mut self,
        mut job: CrawlJob,
        outcome: FetchOutcome,
    ) -> Result<Option<PendingChecks>, CrawlError> {
        let context = job.parent.as_ref().unwrap_or(&job.target).to_string();

        let body = match outcome {
            FetchOutcome::Html(body) => body,
            FetchOutcome::NonHtmlSuccess => {
                job.advance(JobState::Skipped)?;
                self.record(&job);
                self.reporter.debug(&format!(
                    "At page '{}' for href '{}'. The resource was fetched, but it is not an HTML page.",
                    context, job.target
                ));
                return Ok(None);
            }
            FetchOutcome::Failure(reason) => {
                job.advance(JobState::Failed)?;
                self.record(&job);
                self.reporter.error(&context, job.target.as_str(), &reason);
                return Ok(None);
            }
        };

        job.advance(JobState::Parsed)?;
        self.record(&job);

        let links = classify_hrefs(extract_hrefs(&body), &job.target, self.policy);
        self.reporter.debug(&format!(
            "'{}': Found {} internal and {} external hrefs ({} ignored).",
            job.target,
            links.internal.len(),
            links.external.len(),
            links.ignored
        ));

        for rejected in &links.rejected {
            self.reporter
                .error(job.target.as_str(), &rejected.href, &rejected.error.to_string());
        }

        let fresh: Vec<ExternalLink> = links
            .external
            .into_iter()
            .filter(|link| self.external_visited.claim(&link.href))
            .collect();

        for target in links.internal {
            self.frontier.discover(target, &job.target, job.depth)?;
        }

        if fresh.is_empty() {
            Ok(None)
        } else {
            Ok(Some(PendingChecks {
                page: job.target,
                links: fresh,
            }))
        }
    }

    /// Counts a finished job in the statistics
    fn record(&mut self, job: &CrawlJob) {
        let state = job.state();
        match state {
            JobState::Parsed => self.stats.pages_crawled += 1,
            JobState::Skipped => self.stats.pages_skipped += 1,
            JobState::Failed => self.stats.pages_failed += 1,
            JobState::DepthExceeded => self.stats.depth_dropped += 1,
            JobState::Discovered | JobState::Enqueued | JobState::Fetching => {}
        }

        tracing::trace!("'{}' (depth {}) -> {}", job.target, job.depth, state);
    }
}

/// Validates the external links of one page, `ceiling` at a time
async fn validate_links(
    validator: &LinkValidator,
    links: &[ExternalLink],
    ceiling: usize,
) -> Vec<ValidationOutcome> {
    let mut outcomes = Vec::with_capacity(links.len());
    for chunk in links.chunks(ceiling.max(1)) {
        outcomes.extend(join_all(chunk.iter().map(|link| validator.validate(&link.url))).await);
    }
    outcomes
}

/// Runs a complete crawl from an origin string
///
/// This function:
///
/// 1. Parses and validates the origin (fatal on failure)
/// 2. Builds the coordinator (fatal on invalid configuration)
/// 3. Crawls until the frontier empties or the page cap is reached
/// 4. Reports and returns the summary
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sumi_linkcheck::config::Config;
/// use sumi_linkcheck::crawler::run_crawl;
/// use sumi_linkcheck::TracingReporter;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(Config::default(), "https://example.com/", Arc::new(TracingReporter)).await?;
/// println!("{} pages", summary.stats.pages_crawled);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    origin: &str,
    reporter: Arc<dyn Reporter>,
) -> Result<CrawlSummary, CrawlError> {
    let origin_url = crate::url::parse_origin(origin).map_err(|source| CrawlError::Origin {
        input: origin.to_string(),
        source,
    })?;

    let mut coordinator = Coordinator::new(config, origin_url, reporter)?;
    coordinator.run().await
}
