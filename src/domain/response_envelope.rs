use std::fmt;

use serde::Serialize;

use super::processor_result::{Metadata, ProcessorResult};

/// Failure category carried alongside an envelope so the transport layer can
/// pick a status code. Never serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    UnsupportedFileType,
    ProcessingError,
    StorageError,
    PayloadTooLarge,
    BadRequest,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedFileType => "UnsupportedFileType",
            Self::ProcessingError => "ProcessingError",
            Self::StorageError => "StorageError",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::BadRequest => "BadRequest",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseEnvelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip)]
    pub kind: Option<ErrorKind>,
}

impl ResponseEnvelope {
    pub fn failure(kind: ErrorKind, error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            metadata: None,
            error: Some(error.into()),
            kind: Some(kind),
        }
    }
}

pub const PROCESSING_FAILED_PREFIX: &str = "processing failed";

pub fn normalize(result: &ProcessorResult) -> ResponseEnvelope {
    if result.success {
        return ResponseEnvelope {
            success: true,
            content: Some(result.content.clone()),
            metadata: (!result.metadata.is_empty()).then(|| result.metadata.clone()),
            error: None,
            kind: None,
        };
    }

    let cause = result.error.as_deref().unwrap_or("unknown error");
    ResponseEnvelope::failure(
        ErrorKind::ProcessingError,
        format!("{PROCESSING_FAILED_PREFIX}: {cause}"),
    )
}
