use std::io;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::application::ports::{StorageError, WorkingStore};
use crate::domain::WorkingFile;

const MAX_ALLOCATION_ATTEMPTS: usize = 3;

/// Working files on the local disk: uploads under one directory, derived
/// artifacts under another.
pub struct LocalWorkingStore {
    upload_dir: PathBuf,
    processed_dir: PathBuf,
}

impl LocalWorkingStore {
    pub fn new(
        upload_dir: impl Into<PathBuf>,
        processed_dir: impl Into<PathBuf>,
    ) -> Result<Self, StorageError> {
        let upload_dir = upload_dir.into();
        let processed_dir = processed_dir.into();

        for dir in [&upload_dir, &processed_dir] {
            std::fs::create_dir_all(dir).map_err(|source| StorageError::CreateDirectory {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(Self {
            upload_dir,
            processed_dir,
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    pub fn processed_dir(&self) -> &Path {
        &self.processed_dir
    }
}

#[async_trait::async_trait]
impl WorkingStore for LocalWorkingStore {
    async fn allocate(&self, original_filename: &str) -> Result<WorkingFile, StorageError> {
        for _ in 0..MAX_ALLOCATION_ATTEMPTS {
            let file = WorkingFile::new(
                Uuid::new_v4(),
                original_filename,
                &self.upload_dir,
                &self.processed_dir,
            );

            match tokio::fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&file.path)
                .await
            {
                Ok(_) => return Ok(file),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::warn!(path = %file.path.display(), "Working path collision, retrying");
                }
                Err(e) => return Err(StorageError::Allocate(e)),
            }
        }

        Err(StorageError::Exhausted(MAX_ALLOCATION_ATTEMPTS))
    }

    async fn write(&self, file: &WorkingFile, data: Bytes) -> Result<u64, StorageError> {
        let mut handle = tokio::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&file.path)
            .await
            .map_err(StorageError::Write)?;

        handle.write_all(&data).await.map_err(StorageError::Write)?;
        handle.flush().await.map_err(StorageError::Write)?;

        Ok(data.len() as u64)
    }

    async fn release(&self, file: &WorkingFile, retain: bool) {
        if retain {
            tracing::info!(path = %file.path.display(), "Retaining working file");
            return;
        }

        match tokio::fs::remove_file(&file.path).await {
            Ok(()) => tracing::debug!(path = %file.path.display(), "Working file removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %file.path.display(), error = %e, "Failed to remove working file")
            }
        }

        match tokio::fs::remove_dir_all(&file.artifact_dir).await {
            Ok(()) => tracing::debug!(path = %file.artifact_dir.display(), "Artifacts removed"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(path = %file.artifact_dir.display(), error = %e, "Failed to remove artifacts")
            }
        }
    }

    fn roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.upload_dir.clone(), self.processed_dir.clone()];
        for dir in [&self.upload_dir, &self.processed_dir] {
            if let Ok(canonical) = dir.canonicalize() {
                if !roots.contains(&canonical) {
                    roots.push(canonical);
                }
            }
        }
        // Longest first so nested roots are replaced before their parents.
        roots.sort_by_key(|p| std::cmp::Reverse(p.as_os_str().len()));
        roots
    }
}
