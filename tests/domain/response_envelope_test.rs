use docdispatch::domain::{ErrorKind, ProcessorResult, ResponseEnvelope, normalize};

#[test]
fn given_successful_result_when_normalizing_then_content_and_metadata_survive() {
    let result = ProcessorResult::success("# Title").with_metadata("page_count", 3);

    let envelope = normalize(&result);

    assert!(envelope.success);
    assert_eq!(envelope.content.as_deref(), Some("# Title"));
    assert_eq!(envelope.metadata.unwrap()["page_count"], 3);
    assert!(envelope.error.is_none());
    assert!(envelope.kind.is_none());
}

#[test]
fn given_success_without_metadata_when_serialized_then_metadata_is_omitted() {
    let envelope = normalize(&ProcessorResult::success("text"));

    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(json, serde_json::json!({"success": true, "content": "text"}));
}

#[test]
fn given_failed_result_when_normalizing_then_error_is_prefixed() {
    let result = ProcessorResult::failure("bad header").with_metadata("page_count", 1);

    let envelope = normalize(&result);

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some("processing failed: bad header"));
    assert!(envelope.content.is_none());
    assert!(envelope.metadata.is_none());
    assert_eq!(envelope.kind, Some(ErrorKind::ProcessingError));
}

#[test]
fn given_failure_without_cause_when_normalizing_then_reports_unknown_error() {
    let result = ProcessorResult {
        error: None,
        ..ProcessorResult::failure("")
    };

    let envelope = normalize(&result);

    assert_eq!(
        envelope.error.as_deref(),
        Some("processing failed: unknown error")
    );
}

#[test]
fn given_failure_envelope_when_serialized_then_kind_is_not_exposed() {
    let envelope = ResponseEnvelope::failure(ErrorKind::UnsupportedFileType, "unsupported file type: .txt");

    let json = serde_json::to_value(&envelope).unwrap();

    assert_eq!(
        json,
        serde_json::json!({"success": false, "error": "unsupported file type: .txt"})
    );
}

#[test]
fn given_envelope_when_serialized_and_parsed_then_fields_round_trip() {
    let envelope = normalize(&ProcessorResult::success("body").with_metadata("sheet_count", 2));

    let json = serde_json::to_string(&envelope).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed["success"], true);
    assert_eq!(parsed["content"], "body");
    assert_eq!(parsed["metadata"]["sheet_count"], 2);
}
