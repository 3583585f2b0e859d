use crate::config::types::{Config, CrawlerConfig, HttpConfig};
use crate::ConfigError;

/// Upper bound on either concurrency ceiling
const MAX_CONCURRENCY: usize = 200;

/// Accepted range for request timeouts (milliseconds)
const TIMEOUT_RANGE_MS: std::ops::RangeInclusive<u64> = 100..=60_000;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_http_config(&config.http)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    // max_crawling_depth >= 0 is always true for u32, so no check needed

    if config.max_concurrent_internal < 1 || config.max_concurrent_internal > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_internal must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrent_internal
        )));
    }

    if config.max_concurrent_external < 1 || config.max_concurrent_external > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "max_concurrent_external must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.max_concurrent_external
        )));
    }

    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if !TIMEOUT_RANGE_MS.contains(&config.fetch_timeout_ms) {
        return Err(ConfigError::Validation(format!(
            "fetch_timeout_ms must be between {} and {}, got {}",
            TIMEOUT_RANGE_MS.start(),
            TIMEOUT_RANGE_MS.end(),
            config.fetch_timeout_ms
        )));
    }

    if !TIMEOUT_RANGE_MS.contains(&config.validation_timeout_ms) {
        return Err(ConfigError::Validation(format!(
            "validation_timeout_ms must be between {} and {}, got {}",
            TIMEOUT_RANGE_MS.start(),
            TIMEOUT_RANGE_MS.end(),
            config.validation_timeout_ms
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    // Must be a legal header value
    if !config
        .user_agent
        .chars()
        .all(|c| c == '\t' || (' '..='~').contains(&c))
    {
        return Err(ConfigError::Validation(format!(
            "user_agent must be printable ASCII, got '{}'",
            config.user_agent
        )));
    }

    Ok(())
}
