use crate::crawler::CrawlObserver;
use crate::page::PageSnapshot;
use crate::repository::{ExportResult, Repository};
use std::sync::Arc;

/// Snapshots waiting to be exported together
///
/// A batch flushes itself to the repository as soon as it holds `size`
/// pages. Whatever is left when the traversal ends is flushed by
/// [`Batch::finish`], unless nothing is left.
pub struct Batch {
    pages: Vec<PageSnapshot>,
    size: usize,
    repository: Arc<dyn Repository>,
    observer: Arc<dyn CrawlObserver>,
    exported: usize,
}

impl Batch {
    /// Creates an empty batch; a `size` of 0 is treated as 1
    pub fn new(
        repository: Arc<dyn Repository>,
        size: usize,
        observer: Arc<dyn CrawlObserver>,
    ) -> Self {
        let size = size.max(1);
        Self {
            pages: Vec::with_capacity(size),
            size,
            repository,
            observer,
            exported: 0,
        }
    }

    /// Adds a page, exporting the batch if it is now full
    pub async fn push(&mut self, page: PageSnapshot) -> ExportResult<()> {
        self.pages.push(page);
        if self.pages.len() >= self.size {
            self.flush().await?;
        }
        Ok(())
    }

    /// Exports the remaining pages, if any
    ///
    /// # Returns
    ///
    /// The number of times the repository was called by this batch
    pub async fn finish(mut self) -> ExportResult<usize> {
        if !self.pages.is_empty() {
            self.flush().await?;
        }
        Ok(self.exported)
    }

    /// Number of pages waiting
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Returns true if no page is waiting
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    async fn flush(&mut self) -> ExportResult<()> {
        self.repository.export(&self.pages).await?;
        self.exported += 1;
        self.observer.batch_exported(self.pages.len());
        self.pages.clear();
        Ok(())
    }
}
