use docdispatch::application::ports::{DocumentProcessor, ProcessorError};
use docdispatch::infrastructure::processors::{EMPTY_SHEET_MARKER, ExcelProcessor};

use super::stage;

#[tokio::test]
async fn given_empty_workbook_file_when_processing_then_empty_file_error() {
    let (_dir, file) = stage("empty.xlsx", b"").await;

    let result = ExcelProcessor::new().process(&file).await;

    assert!(matches!(result, Err(ProcessorError::EmptyFile(_))));
}

#[tokio::test]
async fn given_corrupt_workbook_when_processing_then_extraction_failed() {
    let (_dir, file) = stage("corrupt.xlsx", b"PK\x03\x04 not really a zip").await;

    let result = ExcelProcessor::new().process(&file).await;

    assert!(matches!(result, Err(ProcessorError::ExtractionFailed(_))));
}

#[tokio::test]
async fn given_workbook_when_processing_then_each_sheet_becomes_a_markdown_section() {
    let (_dir, file) = stage("quarterly.xlsx", include_bytes!("../fixtures/quarterly.xlsx")).await;

    let result = ExcelProcessor::new().process(&file).await.unwrap();

    let expected = format!(
        "# quarterly\n\n## Sales\n\n| Region | Units |\n|---|---|\n| North | 12 |\n| South\\|East | 7 |\n\n## Notes\n\n{EMPTY_SHEET_MARKER}"
    );
    assert!(result.success);
    assert_eq!(result.content, expected);
    assert_eq!(result.metadata["sheet_count"], 2);
    assert_eq!(result.metadata["sheet_names"], serde_json::json!(["Sales", "Notes"]));
    assert_eq!(result.metadata["file_extension"], ".xlsx");
}
