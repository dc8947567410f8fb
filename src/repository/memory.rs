use crate::page::PageSnapshot;
use crate::repository::{ExportResult, Repository};
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};

/// Keeps exported pages in memory
///
/// Every batch is kept as it was received, so callers can inspect both the
/// pages and how they were batched. Suitable for tests and for sites small
/// enough to hold in memory.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    batches: Mutex<Vec<Vec<PageSnapshot>>>,
}

impl InMemoryRepository {
    /// Creates an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// All exported pages, in export order
    pub fn pages(&self) -> Vec<PageSnapshot> {
        self.lock().iter().flatten().cloned().collect()
    }

    /// Every batch received, in export order
    pub fn batches(&self) -> Vec<Vec<PageSnapshot>> {
        self.lock().clone()
    }

    /// Number of times `export` was called
    pub fn export_calls(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<PageSnapshot>>> {
        self.batches.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn export(&self, pages: &[PageSnapshot]) -> ExportResult<()> {
        self.lock().push(pages.to_vec());
        Ok(())
    }
}
