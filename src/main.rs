//! Sumi-Linkcheck main entry point
//!
//! This is the command-line interface for the Sumi-Linkcheck link crawler.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use sumi_linkcheck::config::{load_config, validate, Config};
use sumi_linkcheck::crawler::crawl;
use tracing_subscriber::EnvFilter;

/// Sumi-Linkcheck: a link-integrity crawler
///
/// Sumi-Linkcheck crawls every page reachable from the origin on the same
/// host, and checks every link that leaves the host with a HEAD request.
/// Broken links are logged as warnings, unreachable pages as errors.
#[derive(Parser, Debug)]
#[command(name = "sumi-linkcheck")]
#[command(version)]
#[command(about = "A link-integrity crawler", long_about = None)]
struct Cli {
    /// Absolute http(s) address to start crawling from
    #[arg(value_name = "ORIGIN")]
    origin: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Maximum link distance from the origin
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of HTML pages to crawl
    #[arg(long, value_name = "N")]
    max_pages: Option<u64>,

    /// Internal pages fetched concurrently
    #[arg(long, value_name = "N")]
    internal_concurrency: Option<usize>,

    /// External links validated concurrently per page
    #[arg(long, value_name = "N")]
    external_concurrency: Option<usize>,

    /// Ignore links pointing at the page they appear on
    #[arg(long)]
    skip_self_links: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Returns the origin argument, or the error shown to the user
    fn origin(&self) -> anyhow::Result<&str> {
        self.origin
            .as_deref()
            .context("no origin was given; usage: sumi-linkcheck <ORIGIN>")
    }

    /// Applies command-line overrides on top of the loaded configuration
    fn apply_overrides(&self, config: &mut Config) {
        if let Some(depth) = self.max_depth {
            config.crawler.max_crawling_depth = depth;
        }
        if let Some(pages) = self.max_pages {
            config.crawler.max_pages = pages;
        }
        if let Some(n) = self.internal_concurrency {
            config.crawler.max_concurrent_internal = n;
        }
        if let Some(n) = self.external_concurrency {
            config.crawler.max_concurrent_external = n;
        }
        if self.skip_self_links {
            config.crawler.skip_self_links = true;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let origin = cli.origin()?;

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };
    cli.apply_overrides(&mut config);
    validate(&config).context("invalid configuration")?;

    let summary = crawl(config, origin).await?;
    if summary.page_cap_reached {
        tracing::debug!("Crawl of {} stopped at the page cap", summary.origin);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` takes precedence when it is set.
fn setup_logging(verbose: u8, quiet: bool) {
    let default_filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "sumi_linkcheck=info,warn",
            1 => "sumi_linkcheck=debug,info",
            2 => "sumi_linkcheck=trace,debug",
            _ => "trace",
        }
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
