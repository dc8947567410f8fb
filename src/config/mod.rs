//! Configuration module for Sumi-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use sumi_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Pages per batch: {}", config.crawl.batch_size);
//! ```

mod parser;
mod types;
pub mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, ElasticSearchConfig, ExportConfig, ExportKind, FetcherConfig,
    StrategyKind, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
