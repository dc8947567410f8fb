use crate::page::PageSnapshot;
use crate::repository::{ExportResult, Repository};
use async_trait::async_trait;
use std::mem;
use std::sync::{Arc, Mutex, MutexGuard};

/// Holds exported batches back until they are committed
///
/// Batches reach the target repository only through [`commit`], in the order
/// they were staged. [`discard`] drops them without any export.
///
/// [`commit`]: StagingRepository::commit
/// [`discard`]: StagingRepository::discard
pub struct StagingRepository {
    target: Arc<dyn Repository>,
    staged: Mutex<Vec<Vec<PageSnapshot>>>,
}

impl StagingRepository {
    /// Creates an empty stage in front of `target`
    pub fn new(target: Arc<dyn Repository>) -> Self {
        Self {
            target,
            staged: Mutex::new(Vec::new()),
        }
    }

    /// Number of batches waiting for a commit
    pub fn staged_batches(&self) -> usize {
        self.lock().len()
    }

    /// Exports every staged batch to the target, returning how many
    ///
    /// The stage is emptied first, so a failed commit is not replayed.
    pub async fn commit(&self) -> ExportResult<usize> {
        let batches = mem::take(&mut *self.lock());
        for batch in &batches {
            self.target.export(batch).await?;
        }
        Ok(batches.len())
    }

    /// Drops every staged batch, returning how many
    pub fn discard(&self) -> usize {
        mem::take(&mut *self.lock()).len()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Vec<PageSnapshot>>> {
        self.staged.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Repository for StagingRepository {
    async fn export(&self, pages: &[PageSnapshot]) -> ExportResult<()> {
        self.lock().push(pages.to_vec());
        Ok(())
    }
}
