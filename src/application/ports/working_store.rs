use std::io;
use std::path::PathBuf;

use bytes::Bytes;

use crate::domain::WorkingFile;

#[async_trait::async_trait]
pub trait WorkingStore: Send + Sync {
    /// Reserves a collision-free path for `original_filename` in the upload area.
    async fn allocate(&self, original_filename: &str) -> Result<WorkingFile, StorageError>;

    async fn write(&self, file: &WorkingFile, data: Bytes) -> Result<u64, StorageError>;

    /// Best-effort removal of the file and its artifacts. Never fails.
    async fn release(&self, file: &WorkingFile, retain: bool);

    fn roots(&self) -> Vec<PathBuf>;
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to allocate working file: {0}")]
    Allocate(#[source] io::Error),
    #[error("failed to write working file: {0}")]
    Write(#[source] io::Error),
    #[error("could not find a free working path after {0} attempts")]
    Exhausted(usize),
}
