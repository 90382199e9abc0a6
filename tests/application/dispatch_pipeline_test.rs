use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;

use docdispatch::application::ports::WorkingStore;
use docdispatch::application::services::{DispatchPipeline, ProcessorRegistry};
use docdispatch::domain::{CleanupPolicy, DocumentType, ErrorKind, UploadRequest};
use docdispatch::infrastructure::processors::{
    ImageProcessor, MockBehavior, MockDocumentProcessor,
};
use docdispatch::infrastructure::storage::LocalWorkingStore;
use docdispatch::infrastructure::vision::MockVisionClient;

const TEST_TIMEOUT: Duration = Duration::from_secs(5);

struct Harness {
    dir: tempfile::TempDir,
    processor: Arc<MockDocumentProcessor>,
    pipeline: DispatchPipeline,
}

impl Harness {
    fn new(behavior: MockBehavior) -> Self {
        Self::with(behavior, CleanupPolicy::Always, TEST_TIMEOUT)
    }

    fn with(behavior: MockBehavior, policy: CleanupPolicy, timeout: Duration) -> Self {
        let dir = tempfile::TempDir::new().unwrap();
        let store: Arc<dyn WorkingStore> = Arc::new(
            LocalWorkingStore::new(dir.path().join("uploads"), dir.path().join("processed"))
                .unwrap(),
        );
        let processor = Arc::new(MockDocumentProcessor::new(behavior));

        let mut builder = ProcessorRegistry::builder();
        builder
            .register(DocumentType::Pdf, processor.clone())
            .unwrap();
        let registry = Arc::new(builder.build().unwrap());

        let pipeline = DispatchPipeline::new(registry, store, policy, timeout);

        Self {
            dir,
            processor,
            pipeline,
        }
    }

    fn upload_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("uploads")
    }

    fn uploads_left(&self) -> usize {
        count_entries(&self.upload_dir())
    }
}

fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
}

fn upload(filename: &str, data: &'static [u8]) -> UploadRequest {
    UploadRequest::new(filename, Bytes::from_static(data))
}

#[tokio::test]
async fn given_supported_upload_when_dispatching_then_returns_processor_content() {
    let harness = Harness::new(MockBehavior::Succeed("# Extracted".to_string()));

    let envelope = harness
        .pipeline
        .dispatch(upload("report.pdf", b"%PDF-1.4 body"))
        .await;

    assert!(envelope.success);
    assert_eq!(envelope.content.as_deref(), Some("# Extracted"));
    let metadata = envelope.metadata.unwrap();
    assert_eq!(metadata["document_type"], "pdf");
    assert!(metadata.contains_key("processing_time_ms"));
    assert_eq!(metadata["mock"], true);
    assert_eq!(harness.processor.invocations(), 1);
    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_supported_upload_when_dispatching_then_processor_sees_staged_bytes() {
    let harness = Harness::new(MockBehavior::Succeed("ok".to_string()));

    harness
        .pipeline
        .dispatch(upload("my report.pdf", b"%PDF-1.4 body"))
        .await;

    let seen = harness.processor.last_path().unwrap();
    assert!(seen.starts_with(harness.upload_dir()));
    assert!(
        seen.file_name()
            .unwrap()
            .to_string_lossy()
            .ends_with("_my_report.pdf")
    );
}

#[tokio::test]
async fn given_unsupported_extension_when_dispatching_then_rejects_without_processing() {
    let harness = Harness::new(MockBehavior::Succeed("never".to_string()));

    let envelope = harness
        .pipeline
        .dispatch(upload("notes.txt", b"plain text"))
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("unsupported file type: .txt"));
    assert_eq!(envelope.kind, Some(ErrorKind::UnsupportedFileType));
    assert_eq!(harness.processor.invocations(), 0);
    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_missing_extension_when_dispatching_then_reports_unknown_extension() {
    let harness = Harness::new(MockBehavior::Succeed("never".to_string()));

    let envelope = harness.pipeline.dispatch(upload("README", b"hello")).await;

    assert_eq!(
        envelope.error.as_deref(),
        Some("unsupported file type: unknown")
    );
    assert_eq!(harness.processor.invocations(), 0);
}

#[tokio::test]
async fn given_type_without_registered_processor_when_dispatching_then_unsupported() {
    let harness = Harness::new(MockBehavior::Succeed("never".to_string()));

    let envelope = harness
        .pipeline
        .dispatch(upload("scan.png", b"\x89PNG\r\n\x1a\n"))
        .await;

    assert_eq!(envelope.kind, Some(ErrorKind::UnsupportedFileType));
    assert_eq!(envelope.error.as_deref(), Some("unsupported file type: .png"));
    assert_eq!(harness.processor.invocations(), 0);
    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_extensionless_pdf_bytes_when_dispatching_then_sniffed_as_pdf() {
    let harness = Harness::new(MockBehavior::Succeed("sniffed".to_string()));

    let envelope = harness
        .pipeline
        .dispatch(upload("scan", b"%PDF-1.7\n..."))
        .await;

    assert!(envelope.success);
    assert_eq!(harness.processor.invocations(), 1);
}

#[tokio::test]
async fn given_failing_processor_when_dispatching_then_failure_is_normalized() {
    let harness = Harness::new(MockBehavior::Fail("corrupt xref table".to_string()));

    let envelope = harness
        .pipeline
        .dispatch(upload("broken.pdf", b"%PDF-garbage"))
        .await;

    assert!(!envelope.success);
    assert_eq!(
        envelope.error.as_deref(),
        Some("processing failed: extraction failed: corrupt xref table")
    );
    assert_eq!(envelope.kind, Some(ErrorKind::ProcessingError));
    assert!(envelope.content.is_none());
    assert!(envelope.metadata.is_none());
    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_failure_mentioning_storage_and_secrets_when_dispatching_then_detail_is_sanitized() {
    let dir = tempfile::TempDir::new().unwrap();
    let uploads = dir.path().join("uploads");
    let reason = format!("cannot open {}/x.pdf with api_key=sk-123", uploads.display());
    let store: Arc<dyn WorkingStore> =
        Arc::new(LocalWorkingStore::new(&uploads, dir.path().join("processed")).unwrap());
    let mut builder = ProcessorRegistry::builder();
    builder
        .register(
            DocumentType::Pdf,
            Arc::new(MockDocumentProcessor::failing(&reason)),
        )
        .unwrap();
    let pipeline = DispatchPipeline::new(
        Arc::new(builder.build().unwrap()),
        store,
        CleanupPolicy::Always,
        TEST_TIMEOUT,
    );

    let envelope = pipeline.dispatch(upload("x.pdf", b"%PDF")).await;

    let error = envelope.error.unwrap();
    assert!(!error.contains(&uploads.display().to_string()));
    assert!(error.contains("<storage>/x.pdf"));
    assert!(error.contains("api_key=[REDACTED]"));
    assert!(!error.contains("sk-123"));
}

#[tokio::test]
async fn given_slow_processor_when_deadline_passes_then_times_out_and_releases() {
    let harness = Harness::with(
        MockBehavior::Delay(Duration::from_secs(30)),
        CleanupPolicy::Always,
        Duration::from_millis(50),
    );

    let envelope = harness
        .pipeline
        .dispatch(upload("slow.pdf", b"%PDF-1.4"))
        .await;

    assert!(!envelope.success);
    let error = envelope.error.unwrap();
    assert!(error.starts_with("processing failed: processing timed out after"));
    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_panicking_processor_when_dispatching_then_failure_envelope() {
    let harness = Harness::new(MockBehavior::Panic);

    let envelope = harness
        .pipeline
        .dispatch(upload("boom.pdf", b"%PDF-1.4"))
        .await;

    assert!(!envelope.success);
    assert_eq!(
        envelope.error.as_deref(),
        Some("processing failed: processor terminated unexpectedly")
    );
    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_retain_on_error_policy_when_processing_fails_then_working_file_is_kept() {
    let harness = Harness::with(
        MockBehavior::Fail("bad".to_string()),
        CleanupPolicy::RetainOnError,
        TEST_TIMEOUT,
    );

    harness
        .pipeline
        .dispatch(upload("keep.pdf", b"%PDF-1.4"))
        .await;

    assert_eq!(harness.uploads_left(), 1);
}

#[tokio::test]
async fn given_retain_on_error_policy_when_processing_succeeds_then_working_file_is_removed() {
    let harness = Harness::with(
        MockBehavior::Succeed("ok".to_string()),
        CleanupPolicy::RetainOnError,
        TEST_TIMEOUT,
    );

    harness
        .pipeline
        .dispatch(upload("fine.pdf", b"%PDF-1.4"))
        .await;

    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_concurrent_uploads_when_dispatching_then_each_gets_its_own_working_file() {
    let harness = Arc::new(Harness::new(MockBehavior::Succeed("ok".to_string())));

    let mut handles = Vec::new();
    for i in 0..16 {
        let harness = Arc::clone(&harness);
        handles.push(tokio::spawn(async move {
            let request = UploadRequest::new(format!("doc-{i}.pdf"), Bytes::from_static(b"%PDF"));
            harness.pipeline.dispatch(request).await
        }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().success);
    }
    assert_eq!(harness.processor.invocations(), 16);
    assert_eq!(harness.uploads_left(), 0);
}

#[tokio::test]
async fn given_image_and_unreachable_vision_api_when_dispatching_then_failure_and_file_released() {
    let dir = tempfile::TempDir::new().unwrap();
    let store: Arc<dyn WorkingStore> = Arc::new(
        LocalWorkingStore::new(dir.path().join("uploads"), dir.path().join("processed")).unwrap(),
    );
    let vision = Arc::new(MockVisionClient::failing("connection reset by peer"));
    let mut builder = ProcessorRegistry::builder();
    builder
        .register(DocumentType::Image, Arc::new(ImageProcessor::new(vision)))
        .unwrap();
    let pipeline = DispatchPipeline::new(
        Arc::new(builder.build().unwrap()),
        store,
        CleanupPolicy::Always,
        TEST_TIMEOUT,
    );

    let envelope = pipeline
        .dispatch(upload("scan.jpg", b"\xFF\xD8\xFF\xE0 jpeg body"))
        .await;

    assert!(!envelope.success);
    assert_eq!(envelope.kind, Some(ErrorKind::ProcessingError));
    assert_eq!(
        envelope.error.as_deref(),
        Some("processing failed: vision model: request failed: connection reset by peer")
    );
    assert!(envelope.content.is_none());
    assert_eq!(count_entries(&dir.path().join("uploads")), 0);
    assert_eq!(count_entries(&dir.path().join("processed")), 0);
}
