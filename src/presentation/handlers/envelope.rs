use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::{ErrorKind, ResponseEnvelope};

pub fn status_for(envelope: &ResponseEnvelope) -> StatusCode {
    match envelope.kind {
        None if envelope.success => StatusCode::OK,
        Some(ErrorKind::UnsupportedFileType) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        Some(ErrorKind::BadRequest) => StatusCode::BAD_REQUEST,
        Some(ErrorKind::PayloadTooLarge) => StatusCode::PAYLOAD_TOO_LARGE,
        Some(ErrorKind::ProcessingError | ErrorKind::StorageError) | None => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

pub fn envelope_response(envelope: ResponseEnvelope) -> Response {
    (status_for(&envelope), Json(envelope)).into_response()
}
