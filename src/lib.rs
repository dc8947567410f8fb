//! Sumi-Harvest: a site snapshot harvester
//!
//! This crate crawls a website, either as a link graph starting from its index
//! page or as a fixed list of URLs taken from a sitemap, takes an immutable
//! snapshot of every page and exports the snapshots in bounded batches to a
//! pluggable repository (memory, JSON files or an Elasticsearch index).

pub mod config;
pub mod crawler;
pub mod fetcher;
pub mod output;
pub mod page;
pub mod repository;
pub mod sitemap;
pub mod url;

use thiserror::Error;

/// Main error type for Sumi-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Crawl error: {0}")]
    Crawl(#[from] crawler::CrawlError),

    #[error("Sitemap error: {0}")]
    Sitemap(#[from] sitemap::SitemapError),

    #[error("Export error: {0}")]
    Export(#[from] repository::ExportError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Sumi-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{
    CrawlError, CrawlReport, CrawlStrategy, GraphCrawl, ParallelGraphCrawl, RetriableCrawl,
    SitemapCrawl, SwitchableCrawl,
};
pub use fetcher::{FetchError, FetchedPage, HttpPageFetcher, PageFetcher};
pub use page::PageSnapshot;
pub use repository::{
    ElasticSearchRepository, ExportError, InMemoryRepository, JsonFilesRepository, Repository,
    StagingRepository,
};
pub use url::{IgnoredPatterns, Link};
