//! Crawl observers
//!
//! Strategies report what they do to a [`CrawlObserver`]. The default
//! [`TracingObserver`] turns events into log lines; [`CountingObserver`] also
//! keeps the numbers the CLI prints at the end of a run.

use crate::crawler::{CrawlError, CrawlReport};
use crate::output::CrawlStatistics;
use crate::page::PageSnapshot;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Hooks called by strategies while they run
///
/// Every method has an empty default, so observers implement only what they
/// care about. Hooks are called from the crawling task and must not block.
pub trait CrawlObserver: Send + Sync {
    /// A traversal engine started a run
    fn crawl_started(&self, _strategy: &str, _origin: &str) {}

    /// A page was fetched and snapshotted
    fn page_fetched(&self, _page: &PageSnapshot) {}

    /// A URL was skipped because it matched an ignored pattern
    fn page_ignored(&self, _url: &str) {}

    /// A batch of `pages` pages reached the repository
    fn batch_exported(&self, _pages: usize) {}

    /// A traversal engine finished a run
    fn crawl_finished(&self, _strategy: &str, _report: &CrawlReport) {}

    /// A traversal engine run ended with a fault
    fn crawl_failed(&self, _strategy: &str, _error: &CrawlError) {}

    /// A run is retried after `trial` failed attempts out of `max_trials`
    fn retrying(&self, _trial: u32, _max_trials: u32, _error: &CrawlError) {}

    /// The failsafe strategy takes over
    fn switching(&self, _error: &CrawlError) {}
}

/// Logs crawl events with `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl CrawlObserver for TracingObserver {
    fn crawl_started(&self, strategy: &str, origin: &str) {
        tracing::info!("Starting {} crawl of {}", strategy, origin);
    }

    fn page_fetched(&self, page: &PageSnapshot) {
        tracing::debug!(
            "Crawled {} ({} links)",
            page.url(),
            page.links().len()
        );
    }

    fn page_ignored(&self, url: &str) {
        tracing::debug!("Ignoring {}", url);
    }

    fn batch_exported(&self, pages: usize) {
        tracing::info!("Exported a batch of {} pages", pages);
    }

    fn crawl_finished(&self, strategy: &str, report: &CrawlReport) {
        tracing::info!(
            "Finished {} crawl: {} pages crawled, {} ignored, {} batches exported",
            strategy,
            report.pages_crawled,
            report.pages_ignored,
            report.batches_exported
        );
    }

    fn crawl_failed(&self, strategy: &str, error: &CrawlError) {
        tracing::error!("{} crawl failed: {}", strategy, error);
    }

    fn retrying(&self, trial: u32, max_trials: u32, error: &CrawlError) {
        tracing::warn!(
            "Crawl attempt {} of {} failed, retrying: {}",
            trial,
            max_trials,
            error
        );
    }

    fn switching(&self, error: &CrawlError) {
        tracing::warn!("Crawl failed, switching to failsafe: {}", error);
    }
}

/// Counts crawl events, logging them like [`TracingObserver`]
#[derive(Debug)]
pub struct CountingObserver {
    started_at: chrono::DateTime<Utc>,
    runs_started: AtomicUsize,
    runs_failed: AtomicUsize,
    pages_fetched: AtomicUsize,
    pages_ignored: AtomicUsize,
    links_found: AtomicUsize,
    pages_exported: AtomicUsize,
    batches_exported: AtomicUsize,
    retries: AtomicUsize,
    failovers: AtomicUsize,
    last_error: Mutex<Option<String>>,
}

impl Default for CountingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingObserver {
    /// Creates an observer with all counters at zero
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            runs_started: AtomicUsize::new(0),
            runs_failed: AtomicUsize::new(0),
            pages_fetched: AtomicUsize::new(0),
            pages_ignored: AtomicUsize::new(0),
            links_found: AtomicUsize::new(0),
            pages_exported: AtomicUsize::new(0),
            batches_exported: AtomicUsize::new(0),
            retries: AtomicUsize::new(0),
            failovers: AtomicUsize::new(0),
            last_error: Mutex::new(None),
        }
    }

    /// Snapshot of the counters so far
    pub fn statistics(&self) -> CrawlStatistics {
        CrawlStatistics {
            started_at: self.started_at,
            finished_at: Utc::now(),
            runs_started: self.runs_started.load(Ordering::Relaxed),
            runs_failed: self.runs_failed.load(Ordering::Relaxed),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            pages_ignored: self.pages_ignored.load(Ordering::Relaxed),
            links_found: self.links_found.load(Ordering::Relaxed),
            pages_exported: self.pages_exported.load(Ordering::Relaxed),
            batches_exported: self.batches_exported.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            failovers: self.failovers.load(Ordering::Relaxed),
            last_error: self
                .last_error
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .clone(),
        }
    }
}

impl CrawlObserver for CountingObserver {
    fn crawl_started(&self, strategy: &str, origin: &str) {
        self.runs_started.fetch_add(1, Ordering::Relaxed);
        TracingObserver.crawl_started(strategy, origin);
    }

    fn page_fetched(&self, page: &PageSnapshot) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
        self.links_found
            .fetch_add(page.links().len(), Ordering::Relaxed);
        TracingObserver.page_fetched(page);
    }

    fn page_ignored(&self, url: &str) {
        self.pages_ignored.fetch_add(1, Ordering::Relaxed);
        TracingObserver.page_ignored(url);
    }

    fn batch_exported(&self, pages: usize) {
        self.batches_exported.fetch_add(1, Ordering::Relaxed);
        self.pages_exported.fetch_add(pages, Ordering::Relaxed);
        TracingObserver.batch_exported(pages);
    }

    fn crawl_finished(&self, strategy: &str, report: &CrawlReport) {
        TracingObserver.crawl_finished(strategy, report);
    }

    fn crawl_failed(&self, strategy: &str, error: &CrawlError) {
        self.runs_failed.fetch_add(1, Ordering::Relaxed);
        *self.last_error.lock().unwrap_or_else(|e| e.into_inner()) = Some(error.to_string());
        TracingObserver.crawl_failed(strategy, error);
    }

    fn retrying(&self, trial: u32, max_trials: u32, error: &CrawlError) {
        self.retries.fetch_add(1, Ordering::Relaxed);
        TracingObserver.retrying(trial, max_trials, error);
    }

    fn switching(&self, error: &CrawlError) {
        self.failovers.fetch_add(1, Ordering::Relaxed);
        TracingObserver.switching(error);
    }
}
