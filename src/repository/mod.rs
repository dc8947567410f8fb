//! Repositories: where crawled pages are exported
//!
//! The crawl engines hand every full batch of snapshots to a [`Repository`].
//! This module defines the contract and the bundled backends:
//! - In-memory, for tests and small sites
//! - One pretty-printed JSON file per page
//! - An Elasticsearch index, through the `_bulk` API
//!
//! [`StagingRepository`] sits in front of any of them and holds batches back
//! until a crawl has succeeded.

mod elasticsearch;
mod json_files;
mod memory;
mod staging;

pub use elasticsearch::{BulkContent, ElasticSearchIndex, ElasticSearchRepository};
pub use json_files::JsonFilesRepository;
pub use memory::InMemoryRepository;
pub use staging::StagingRepository;

use crate::page::PageSnapshot;
use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while exporting pages
///
/// Export faults are never retried and never trigger a failsafe crawl.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("Server error from {url}: HTTP {status}")]
    ServerError { url: String, status: u16 },

    #[error("Bulk content needs at least one page")]
    EmptyBulk,

    #[error("Export failed: {0}")]
    Failed(String),
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;

/// Sink for crawled pages
///
/// `export` is called once per batch, possibly many times within one crawl
/// run, each time with pages not exported before in that run.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Exports a batch of pages
    async fn export(&self, pages: &[PageSnapshot]) -> ExportResult<()>;
}
