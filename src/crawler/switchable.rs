use crate::crawler::{CrawlObserver, CrawlReport, CrawlResult, CrawlStrategy, TracingObserver};
use crate::repository::StagingRepository;
use async_trait::async_trait;
use std::sync::Arc;

/// Falls back to another strategy when the first one hits a fetch fault
///
/// The initial strategy exports into a [`StagingRepository`]. Its batches
/// are committed only when it succeeds and are discarded when it fails, so
/// at most one of the two strategies exports anything per crawl.
///
/// The failsafe runs at most once per crawl and its outcome, success or
/// fault, is the outcome of the crawl. Export faults of the initial strategy,
/// including a failed commit, are returned without running the failsafe.
pub struct SwitchableCrawl {
    initial: Box<dyn CrawlStrategy>,
    failsafe: Box<dyn CrawlStrategy>,
    staging: Arc<StagingRepository>,
    observer: Arc<dyn CrawlObserver>,
}

impl SwitchableCrawl {
    /// Creates a crawl running `initial`, then `failsafe` if needed
    ///
    /// `staging` must be the repository `initial` exports into.
    pub fn new(
        initial: Box<dyn CrawlStrategy>,
        failsafe: Box<dyn CrawlStrategy>,
        staging: Arc<StagingRepository>,
    ) -> Self {
        Self {
            initial,
            failsafe,
            staging,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the default observer
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }
}

#[async_trait]
impl CrawlStrategy for SwitchableCrawl {
    async fn crawl(&self) -> CrawlResult<CrawlReport> {
        self.staging.discard();
        match self.initial.crawl().await {
            Ok(report) => {
                self.staging.commit().await?;
                Ok(report)
            }
            Err(e) if e.is_transient() => {
                let dropped = self.staging.discard();
                tracing::debug!("Discarded {} staged batches", dropped);
                self.observer.switching(&e);
                self.failsafe.crawl().await
            }
            Err(e) => {
                self.staging.discard();
                Err(e)
            }
        }
    }
}
