use crate::application::ports::StorageError;
use crate::domain::{ErrorKind, extension_of};

const UNKNOWN_EXTENSION: &str = "unknown";

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unsupported file type: {extension}")]
    UnsupportedFileType { extension: String },
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DispatchError {
    pub fn unsupported(filename: &str) -> Self {
        Self::UnsupportedFileType {
            extension: extension_of(filename).unwrap_or_else(|| UNKNOWN_EXTENSION.to_string()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnsupportedFileType { .. } => ErrorKind::UnsupportedFileType,
            Self::Storage(_) => ErrorKind::StorageError,
        }
    }
}
