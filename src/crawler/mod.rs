//! Crawl strategies
//!
//! This module contains the traversal engines and their decorators:
//! - Graph crawls following links from an index page (one or many sessions)
//! - Sitemap crawls over a fixed list of URLs
//! - Batching of snapshots towards a repository
//! - Retry and fail-over composition
//! - Observer hooks for logging and statistics
//!
//! Every strategy implements [`CrawlStrategy`]. A strategy owns no state
//! between runs, so the same value can be crawled again, which is what
//! [`RetriableCrawl`] relies on.

mod batch;
mod builder;
mod graph;
mod observer;
mod parallel;
mod retriable;
mod sitemap;
mod switchable;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::Batch;
pub use builder::{build_repository, build_strategy};
pub use graph::GraphCrawl;
pub use observer::{CountingObserver, CrawlObserver, TracingObserver};
pub use parallel::ParallelGraphCrawl;
pub use retriable::RetriableCrawl;
pub use sitemap::SitemapCrawl;
pub use switchable::SwitchableCrawl;

use crate::fetcher::FetchError;
use crate::repository::ExportError;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// The fault that ended a crawl run
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

impl CrawlError {
    /// Returns true for faults worth retrying or failing over
    ///
    /// Only fetch faults are transient. Export faults always end the run.
    pub fn is_transient(&self) -> bool {
        matches!(self, CrawlError::Fetch(_))
    }
}

/// Result type for crawl operations
pub type CrawlResult<T> = Result<T, CrawlError>;

/// Outcome of a successful crawl run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlReport {
    /// Pages fetched and snapshotted
    pub pages_crawled: usize,

    /// URLs skipped because they matched an ignored pattern
    pub pages_ignored: usize,

    /// Calls made to the repository
    pub batches_exported: usize,
}

/// A way of crawling a website
#[async_trait]
pub trait CrawlStrategy: Send + Sync {
    /// Runs one complete crawl
    ///
    /// Either every batch was exported and a report is returned, or the run
    /// ended with exactly one fault.
    async fn crawl(&self) -> CrawlResult<CrawlReport>;
}

#[async_trait]
impl<S: CrawlStrategy + ?Sized> CrawlStrategy for Arc<S> {
    async fn crawl(&self) -> CrawlResult<CrawlReport> {
        self.as_ref().crawl().await
    }
}
