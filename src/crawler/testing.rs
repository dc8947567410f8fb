//! Test doubles for crawl strategies

use crate::crawler::{CrawlError, CrawlReport, CrawlResult, CrawlStrategy};
use crate::fetcher::{FetchError, FetchResult, FetchedPage, PageFetcher};
use crate::page::PageSnapshot;
use crate::repository::{ExportError, ExportResult, Repository};
use crate::url::{normalize_href, Link};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// Serves a fixed site from memory
///
/// Unknown URLs are served as empty pages. URLs registered with
/// [`StubFetcher::failing`] raise a timeout the given number of times.
#[derive(Default)]
pub(crate) struct StubFetcher {
    pages: HashMap<String, FetchedPage>,
    failures: Mutex<HashMap<String, usize>>,
    fetched: Mutex<Vec<String>>,
    attempts: AtomicUsize,
    releases: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Option<Duration>,
}

impl StubFetcher {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, links: &[&str]) -> Self {
        let page = FetchedPage {
            title: format!("Title of {}", url),
            text_content: format!("Text of {}", url),
            category: String::new(),
            links: links.iter().map(|href| Link::new(*href, *href)).collect(),
        };
        self.pages.insert(normalize_href(url).to_string(), page);
        self
    }

    pub(crate) fn failing(self, url: &str, times: usize) -> Self {
        self.failures
            .lock()
            .unwrap()
            .insert(normalize_href(url).to_string(), times);
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }

    pub(crate) fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub(crate) fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub(crate) fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> FetchResult<FetchedPage> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let key = normalize_href(url).to_string();
        {
            let mut failures = self.failures.lock().unwrap();
            if let Some(left) = failures.get_mut(&key) {
                if *left > 0 {
                    *left -= 1;
                    return Err(FetchError::Timeout {
                        url: url.to_string(),
                    });
                }
            }
        }

        self.fetched.lock().unwrap().push(url.to_string());
        Ok(self.pages.get(&key).cloned().unwrap_or_default())
    }

    async fn release(&self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Repository whose every export fails
#[derive(Default)]
pub(crate) struct FailingRepository {
    calls: AtomicUsize,
}

impl FailingRepository {
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Repository for FailingRepository {
    async fn export(&self, _pages: &[PageSnapshot]) -> ExportResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ExportError::Failed("repository unavailable".to_string()))
    }
}

/// Strategy replaying prepared outcomes, then succeeding
#[derive(Default)]
pub(crate) struct ScriptedCrawl {
    outcomes: Mutex<VecDeque<CrawlResult<CrawlReport>>>,
    calls: AtomicUsize,
}

impl ScriptedCrawl {
    pub(crate) fn new(outcomes: Vec<CrawlResult<CrawlReport>>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: AtomicUsize::new(0),
        }
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CrawlStrategy for ScriptedCrawl {
    async fn crawl(&self) -> CrawlResult<CrawlReport> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(CrawlReport::default()))
    }
}

pub(crate) fn fetch_fault(url: &str) -> CrawlError {
    CrawlError::Fetch(FetchError::Timeout {
        url: url.to_string(),
    })
}

pub(crate) fn export_fault() -> CrawlError {
    CrawlError::Export(ExportError::Failed("repository unavailable".to_string()))
}
