use async_trait::async_trait;

use crate::domain::{ProcessorResult, WorkingFile};

use super::vision_client::VisionClientError;

/// The single capability every document-type handler provides.
#[async_trait]
pub trait DocumentProcessor: Send + Sync {
    async fn process(&self, file: &WorkingFile) -> Result<ProcessorResult, ProcessorError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("file is empty: {0}")]
    EmptyFile(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("no content extracted from {0}")]
    NoContent(String),
    #[error("vision model: {0}")]
    Vision(#[from] VisionClientError),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
