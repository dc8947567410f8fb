use crate::crawler::{Batch, CrawlObserver, CrawlReport, CrawlResult, CrawlStrategy, TracingObserver};
use crate::fetcher::PageFetcher;
use crate::page::PageSnapshot;
use crate::repository::Repository;
use crate::sitemap::Sitemap;
use crate::url::{strip_fragment, IgnoredPatterns};
use async_trait::async_trait;
use std::sync::Arc;

/// Crawls exactly the pages listed in a sitemap
///
/// Pages are visited once each, in sitemap order. Links found on the pages
/// are not followed.
pub struct SitemapCrawl {
    sitemap: Sitemap,
    fetcher: Arc<dyn PageFetcher>,
    ignored: IgnoredPatterns,
    repository: Arc<dyn Repository>,
    batch_size: usize,
    observer: Arc<dyn CrawlObserver>,
}

impl SitemapCrawl {
    /// Creates a crawl over an already loaded sitemap
    pub fn new(
        sitemap: Sitemap,
        fetcher: Arc<dyn PageFetcher>,
        ignored: IgnoredPatterns,
        repository: Arc<dyn Repository>,
        batch_size: usize,
    ) -> Self {
        Self {
            sitemap,
            fetcher,
            ignored,
            repository,
            batch_size,
            observer: Arc::new(TracingObserver),
        }
    }

    /// Replaces the default observer
    pub fn with_observer(mut self, observer: Arc<dyn CrawlObserver>) -> Self {
        self.observer = observer;
        self
    }

    async fn traverse(&self) -> CrawlResult<CrawlReport> {
        let mut report = CrawlReport::default();
        let mut batch = Batch::new(
            self.repository.clone(),
            self.batch_size,
            self.observer.clone(),
        );

        for url in self.sitemap.locations() {
            if self.ignored.contains(url) {
                report.pages_ignored += 1;
                self.observer.page_ignored(url);
                continue;
            }

            let target = strip_fragment(url);
            let page = self.fetcher.fetch(target).await?;
            let snapshot = PageSnapshot::capture(target, page);
            self.observer.page_fetched(&snapshot);
            report.pages_crawled += 1;
            batch.push(snapshot).await?;
        }

        report.batches_exported = batch.finish().await?;
        Ok(report)
    }
}

#[async_trait]
impl CrawlStrategy for SitemapCrawl {
    async fn crawl(&self) -> CrawlResult<CrawlReport> {
        let origin = format!("{} sitemap pages", self.sitemap.len());
        self.observer.crawl_started("sitemap", &origin);

        let outcome = self.traverse().await;
        self.fetcher.release().await;

        match &outcome {
            Ok(report) => self.observer.crawl_finished("sitemap", report),
            Err(e) => self.observer.crawl_failed("sitemap", e),
        }
        outcome
    }
}
