use crate::crawler::{CrawlObserver, CrawlReport, CrawlResult, CrawlStrategy, TracingObserver};
use async_trait::async_trait;
use std::sync::Arc;

/// Default number of attempts
pub const DEFAULT_MAX_TRIALS: u32 = 3;

/// Runs a crawl again from scratch when it hits a fetch fault
///
/// The wrapped strategy is started at most `max_trials` times per call to
/// [`crawl`](CrawlStrategy::crawl). Export faults are returned at once and
/// never retried. When every attempt failed, the last fetch fault is
/// returned.
pub struct RetriableCrawl {
    inner: Box<dyn CrawlStrategy>,
    max_trials: u32,
    observer: Arc<dyn CrawlObserver>,
}

impl RetriableCrawl {
    /// Wraps `inner` with the default of three attempts
    pub fn new(inner: Box<dyn CrawlStrategy>) -> Self {
        Self::with_trials(inner, DEFAULT_MAX_TRIALS)
    }

    /// Wraps `inner` with `max_trials` attempts, at least one
    pub fn with_trials(inner: Box<dyn CrawlStrategy>, max_trials: u32) -> Self {
        Self {
            inner,
            max_trials: max_trials.max(1),
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the default observer
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Maximum number of attempts per crawl
    pub fn max_trials(&self) -> u32 {
        self.max_trials
    }
}

#[async_trait]
impl CrawlStrategy for RetriableCrawl {
    async fn crawl(&self) -> CrawlResult<CrawlReport> {
        let mut trial = 1;
        loop {
            match self.inner.crawl().await {
                Err(e) if e.is_transient() && trial < self.max_trials => {
                    self.observer.retrying(trial, self.max_trials, &e);
                    trial += 1;
                }
                outcome => return outcome,
            }
        }
    }
}
