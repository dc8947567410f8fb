use crate::crawler::{Batch, CrawlObserver, CrawlReport, CrawlResult, CrawlStrategy, TracingObserver};
use crate::fetcher::PageFetcher;
use crate::page::PageSnapshot;
use crate::repository::Repository;
use crate::url::{IgnoredPatterns, Link};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// Crawls a website by following links from its index page
///
/// Pages are visited breadth-first, in the order their links were
/// discovered. A link is fetched at most once per run, however many pages
/// point to it. URLs matching an ignored pattern are never fetched.
///
/// The fetch session is released when the run ends, whether it succeeded or
/// not.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use sumi_harvest::{CrawlStrategy, GraphCrawl, IgnoredPatterns, InMemoryRepository};
/// # async fn run(fetcher: Arc<dyn sumi_harvest::PageFetcher>) {
/// let repository = Arc::new(InMemoryRepository::new());
/// let crawl = GraphCrawl::new(
///     "https://example.com",
///     fetcher,
///     IgnoredPatterns::new(["*.pdf"]),
///     repository.clone(),
///     10,
/// );
/// let report = crawl.crawl().await.unwrap();
/// println!("{} pages crawled", report.pages_crawled);
/// # }
/// ```
pub struct GraphCrawl {
    index: String,
    fetcher: Arc<dyn PageFetcher>,
    ignored: IgnoredPatterns,
    repository: Arc<dyn Repository>,
    batch_size: usize,
    observer: Arc<dyn CrawlObserver>,
}

impl GraphCrawl {
    /// Creates a graph crawl starting at `index`
    pub fn new(
        index: impl Into<String>,
        fetcher: Arc<dyn PageFetcher>,
        ignored: IgnoredPatterns,
        repository: Arc<dyn Repository>,
        batch_size: usize,
    ) -> Self {
        Self {
            index: index.into(),
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

    /// The index page
    pub fn index(&self) -> &str {
        &self.index
    }

    async fn traverse(&self) -> CrawlResult<CrawlReport> {
        let mut report = CrawlReport::default();
        let mut batch = Batch::new(
            self.repository.clone(),
            self.batch_size,
            self.observer.clone(),
        );

        let index = Link::new("index", self.index.as_str());
        let mut visited = HashSet::from([index.clone()]);
        let mut to_visit = VecDeque::from([index]);

        while let Some(link) = to_visit.pop_front() {
            if self.ignored.contains(link.href()) {
                report.pages_ignored += 1;
                self.observer.page_ignored(link.href());
                continue;
            }

            let page = self.fetcher.fetch(link.target()).await?;
            let snapshot = PageSnapshot::capture(link.target(), page);
            self.observer.page_fetched(&snapshot);
            report.pages_crawled += 1;

            for outbound in snapshot.links() {
                if visited.insert(outbound.clone()) {
                    to_visit.push_back(outbound.clone());
                }
            }

            batch.push(snapshot).await?;
        }

        report.batches_exported = batch.finish().await?;
        Ok(report)
    }
}

#[async_trait]
impl CrawlStrategy for GraphCrawl {
    async fn crawl(&self) -> CrawlResult<CrawlReport> {
        self.observer.crawl_started("graph", &self.index);

        let outcome = self.traverse().await;
        self.fetcher.release().await;

        match &outcome {
            Ok(report) => self.observer.crawl_finished("graph", report),
            Err(e) => self.observer.crawl_failed("graph", e),
        }
        outcome
    }
}
