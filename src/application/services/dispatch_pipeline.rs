use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::application::ports::{DocumentProcessor, WorkingStore};
use crate::domain::{
    CleanupPolicy, DocumentType, ProcessorResult, ResponseEnvelope, UploadRequest, WorkingFile,
    classify_with_hints, normalize,
};

use super::dispatch_error::DispatchError;
use super::error_detail::sanitize_error_detail;
use super::processor_registry::ProcessorRegistry;

const SNIFF_LEN: usize = 512;

/// Lifecycle of a single upload through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Received,
    Classified,
    Dispatched,
    Processed,
    Cleaned,
    Responded,
    Errored,
}

impl RequestState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Classified => "classified",
            Self::Dispatched => "dispatched",
            Self::Processed => "processed",
            Self::Cleaned => "cleaned",
            Self::Responded => "responded",
            Self::Errored => "errored",
        }
    }
}

pub struct DispatchPipeline {
    registry: Arc<ProcessorRegistry>,
    store: Arc<dyn WorkingStore>,
    cleanup_policy: CleanupPolicy,
    processing_timeout: Duration,
    redacted_roots: Vec<PathBuf>,
}

impl DispatchPipeline {
    pub fn new(
        registry: Arc<ProcessorRegistry>,
        store: Arc<dyn WorkingStore>,
        cleanup_policy: CleanupPolicy,
        processing_timeout: Duration,
    ) -> Self {
        let redacted_roots = store.roots();
        Self {
            registry,
            store,
            cleanup_policy,
            processing_timeout,
            redacted_roots,
        }
    }

    pub fn registry(&self) -> &ProcessorRegistry {
        &self.registry
    }

    #[tracing::instrument(
        skip(self, request),
        fields(filename = %request.filename, bytes = request.data.len())
    )]
    pub async fn dispatch(&self, request: UploadRequest) -> ResponseEnvelope {
        let started = Instant::now();
        transition(RequestState::Received);

        let sniffed = &request.data[..request.data.len().min(SNIFF_LEN)];
        let document_type = classify_with_hints(
            &request.filename,
            request.declared_content_type.as_deref(),
            Some(sniffed),
        );
        if document_type == DocumentType::Unsupported {
            return self.reject(DispatchError::unsupported(&request.filename));
        }
        transition(RequestState::Classified);

        let processor = match self.registry.lookup(document_type) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!(error = %e, "No processor for classified upload");
                return self.reject(DispatchError::unsupported(&request.filename));
            }
        };
        transition(RequestState::Dispatched);

        let file = match self.stage(&request).await {
            Ok(f) => f,
            Err(e) => return self.reject(e),
        };

        let result = self
            .invoke(processor, &file)
            .await
            .with_metadata("processing_time_ms", started.elapsed().as_millis() as u64)
            .with_metadata("document_type", document_type.as_str());
        transition(RequestState::Processed);

        let retain = self.cleanup_policy.retains(result.success);
        self.store.release(&file, retain).await;
        transition(RequestState::Cleaned);

        let envelope = self.respond(&result);
        tracing::info!(
            document_type = %document_type,
            success = result.success,
            retained = retain,
            "Document processed"
        );
        transition(RequestState::Responded);

        envelope
    }

    async fn stage(&self, request: &UploadRequest) -> Result<WorkingFile, DispatchError> {
        let file = self.store.allocate(&request.filename).await?;

        if let Err(e) = self.store.write(&file, request.data.clone()).await {
            self.store.release(&file, false).await;
            return Err(e.into());
        }

        tracing::debug!(path = %file.path.display(), "Working file staged");
        Ok(file)
    }

    async fn invoke(
        &self,
        processor: Arc<dyn DocumentProcessor>,
        file: &WorkingFile,
    ) -> ProcessorResult {
        let task_file = file.clone();
        let handle = tokio::spawn(async move { processor.process(&task_file).await });
        let abort_handle = handle.abort_handle();

        match tokio::time::timeout(self.processing_timeout, handle).await {
            Ok(Ok(Ok(result))) => result,
            Ok(Ok(Err(e))) => ProcessorResult::failure(e.to_string()),
            Ok(Err(join_error)) => {
                tracing::error!(error = %join_error, "Processor task did not complete");
                ProcessorResult::failure("processor terminated unexpectedly")
            }
            Err(_) => {
                abort_handle.abort();
                ProcessorResult::failure(format!(
                    "processing timed out after {}s",
                    self.processing_timeout.as_secs_f64()
                ))
            }
        }
    }

    fn respond(&self, result: &ProcessorResult) -> ResponseEnvelope {
        if result.success {
            return normalize(result);
        }

        let cause = result.error.as_deref().unwrap_or_default();
        tracing::error!(cause, "Document processing failed");

        let sanitized = ProcessorResult {
            error: Some(sanitize_error_detail(cause, &self.redacted_roots)),
            ..result.clone()
        };
        normalize(&sanitized)
    }

    fn reject(&self, error: DispatchError) -> ResponseEnvelope {
        transition(RequestState::Errored);
        match &error {
            DispatchError::UnsupportedFileType { .. } => {
                tracing::warn!(error = %error, "Upload rejected")
            }
            _ => tracing::error!(error = %error, "Upload failed"),
        }

        let message = match &error {
            DispatchError::UnsupportedFileType { .. } => error.to_string(),
            _ => sanitize_error_detail(&error.to_string(), &self.redacted_roots),
        };
        ResponseEnvelope::failure(error.kind(), message)
    }
}

fn transition(state: RequestState) {
    tracing::debug!(state = state.as_str(), "Request state changed");
}
