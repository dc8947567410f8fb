use crate::page::PageSnapshot;
use crate::repository::{ExportResult, Repository};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Writes every page to `<directory>/<page name>.json`
///
/// Files are pretty-printed and replace any existing file with the same name.
/// The directory is created on first export if it does not exist.
#[derive(Debug, Clone)]
pub struct JsonFilesRepository {
    directory: PathBuf,
}

impl JsonFilesRepository {
    /// Creates a repository writing into `directory`
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// The target directory
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Path of the file a page is written to
    pub fn file_for(&self, page: &PageSnapshot) -> PathBuf {
        self.directory.join(format!("{}.json", page.name()))
    }
}

#[async_trait]
impl Repository for JsonFilesRepository {
    async fn export(&self, pages: &[PageSnapshot]) -> ExportResult<()> {
        tokio::fs::create_dir_all(&self.directory).await?;

        for page in pages {
            let path = self.file_for(page);
            let json = serde_json::to_string_pretty(page)?;
            tokio::fs::write(&path, json).await.map_err(|e| {
                tracing::error!("Failed to write {}: {}", path.display(), e);
                e
            })?;
            tracing::debug!("Exported {} to {}", page.url(), path.display());
        }

        tracing::info!(
            "Exported {} pages to {}",
            pages.len(),
            self.directory.display()
        );
        Ok(())
    }
}
