use serde::Deserialize;

/// Main configuration structure for Sumi-Linkcheck
///
/// Every key is optional; a missing table or key falls back to its default.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

/// Crawl bounds and concurrency ceilings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CrawlerConfig {
    /// Maximum number of internal pages fetched at once
    #[serde(default = "default_max_concurrent_internal")]
    pub max_concurrent_internal: usize,

    /// Maximum number of external links probed at once for a single page
    #[serde(default = "default_max_concurrent_external")]
    pub max_concurrent_external: usize,

    /// Maximum distance in links from the origin page
    #[serde(default = "default_max_crawling_depth")]
    pub max_crawling_depth: u32,

    /// Maximum number of HTML pages crawled in one run
    #[serde(default = "default_max_pages")]
    pub max_pages: u64,

    /// Drop hrefs pointing back at the page they appear on
    #[serde(default = "default_skip_self_links")]
    pub skip_self_links: bool,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_internal: default_max_concurrent_internal(),
            max_concurrent_external: default_max_concurrent_external(),
            max_crawling_depth: default_max_crawling_depth(),
            max_pages: default_max_pages(),
            skip_self_links: default_skip_self_links(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct HttpConfig {
    /// Timeout of a page fetch (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Timeout of a single link probe (milliseconds)
    #[serde(default = "default_timeout_ms")]
    pub validation_timeout_ms: u64,

    /// User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_ms: default_timeout_ms(),
            validation_timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_max_concurrent_internal() -> usize {
    10
}

fn default_max_concurrent_external() -> usize {
    20
}

fn default_max_crawling_depth() -> u32 {
    5
}

fn default_max_pages() -> u64 {
    1000
}

fn default_skip_self_links() -> bool {
    false
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_user_agent() -> String {
    format!("SumiLinkcheck/{}", env!("CARGO_PKG_VERSION"))
}
