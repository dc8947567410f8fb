use crate::crawler::{Batch, CrawlObserver, CrawlReport, CrawlResult, CrawlStrategy, TracingObserver};
use crate::fetcher::{FetchError, FetchResult, FetchedPage, PageFetcher};
use crate::page::PageSnapshot;
use crate::repository::Repository;
use crate::url::{IgnoredPatterns, Link};
use async_trait::async_trait;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::task::JoinSet;

type Fetched = (Arc<dyn PageFetcher>, Link, FetchResult<FetchedPage>);

/// Graph crawl spreading its fetches over several sessions
///
/// Behaves like [`GraphCrawl`](crate::crawler::GraphCrawl), except that up to
/// one fetch per session is in flight at any time. The queue and the visited
/// set stay with the coordinating task; sessions only fetch. Pages reach the
/// batch in the order their fetches complete.
///
/// Every session is released when the run ends. If one fetch fails, the
/// fetches still in flight are aborted.
pub struct ParallelGraphCrawl {
    index: String,
    sessions: Vec<Arc<dyn PageFetcher>>,
    ignored: IgnoredPatterns,
    repository: Arc<dyn Repository>,
    batch_size: usize,
    observer: Arc<dyn CrawlObserver>,
}

impl ParallelGraphCrawl {
    /// Creates a crawl starting at `index` using the given sessions
    pub fn new(
        index: impl Into<String>,
        sessions: Vec<Arc<dyn PageFetcher>>,
        ignored: IgnoredPatterns,
        repository: Arc<dyn Repository>,
        batch_size: usize,
    ) -> Self {
        Self {
            index: index.into(),
            sessions,
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

    /// Number of fetch sessions
    pub fn sessions(&self) -> usize {
        self.sessions.len()
    }

    async fn traverse(&self) -> CrawlResult<CrawlReport> {
        if self.sessions.is_empty() {
            return Err(FetchError::Session("no fetch sessions available".to_string()).into());
        }

        let mut report = CrawlReport::default();
        let mut batch = Batch::new(
            self.repository.clone(),
            self.batch_size,
            self.observer.clone(),
        );

        let index = Link::new("index", self.index.as_str());
        let mut visited = HashSet::from([index.clone()]);
        let mut to_visit = VecDeque::from([index]);
        let mut idle = self.sessions.clone();
        let mut in_flight: JoinSet<Fetched> = JoinSet::new();

        loop {
            while !idle.is_empty() {
                let Some(link) = to_visit.pop_front() else {
                    break;
                };

                if self.ignored.contains(link.href()) {
                    report.pages_ignored += 1;
                    self.observer.page_ignored(link.href());
                    continue;
                }

                let Some(session) = idle.pop() else {
                    break;
                };
                in_flight.spawn(async move {
                    let result = session.fetch(link.target()).await;
                    (session, link, result)
                });
            }

            let Some(joined) = in_flight.join_next().await else {
                break;
            };
            let (session, link, result) =
                joined.map_err(|e| FetchError::Session(format!("fetch task failed: {}", e)))?;
            idle.push(session);

            let snapshot = PageSnapshot::capture(link.target(), result?);
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
impl CrawlStrategy for ParallelGraphCrawl {
    async fn crawl(&self) -> CrawlResult<CrawlReport> {
        self.observer.crawl_started("parallel graph", &self.index);

        let outcome = self.traverse().await;
        for session in &self.sessions {
            session.release().await;
        }

        match &outcome {
            Ok(report) => self.observer.crawl_finished("parallel graph", report),
            Err(e) => self.observer.crawl_failed("parallel graph", e),
        }
        outcome
    }
}
