//! Configuration module for the scraper
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; the defaults reproduce a plain run against the
//! Larodan monounsaturated fatty acid listing.
//!
//! # Example
//!
//! ```no_run
//! use larodan_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Crawling {} with {} workers", config.crawler.base_url, config.crawler.concurrency);
//! ```

mod parser;
mod types;
mod validation;

pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig, DEFAULT_BASE_URL};

pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
