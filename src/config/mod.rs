//! Configuration module for Sumi-Linkcheck
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every setting has a default, so a crawl can run
//! without any file at all.
//!
//! # Example
//!
//! ```no_run
//! use sumi_linkcheck::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkcheck.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_crawling_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, HttpConfig};

pub use parser::{load_config, parse_config};
pub use validation::validate;
