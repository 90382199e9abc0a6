use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::Response;

use crate::domain::{ErrorKind, ResponseEnvelope, UploadRequest};
use crate::presentation::state::AppState;

use super::envelope::envelope_response;

const FILE_FIELD: &str = "file";

#[tracing::instrument(skip(state, multipart))]
pub async fn process_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(e) => {
            tracing::warn!(error = %e, "Rejected non-multipart upload");
            return envelope_response(ResponseEnvelope::failure(
                ErrorKind::BadRequest,
                format!("invalid multipart request: {}", e.body_text()),
            ));
        }
    };

    let max_bytes = state.settings.storage.max_upload_size_bytes;
    let request = match read_upload(&mut multipart, max_bytes).await {
        Ok(request) => request,
        Err(envelope) => return envelope_response(envelope),
    };

    tracing::debug!(
        filename = %request.filename,
        bytes = request.size_bytes(),
        "File upload received"
    );

    envelope_response(state.pipeline.dispatch(request).await)
}

async fn read_upload(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadRequest, ResponseEnvelope> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_failure)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().trim().to_string();
        if filename.is_empty() {
            tracing::warn!("Upload with an empty filename");
            return Err(ResponseEnvelope::failure(
                ErrorKind::BadRequest,
                "no file selected",
            ));
        }
        let content_type = field.content_type().map(String::from);

        let data = field.bytes().await.map_err(multipart_failure)?;
        if data.len() > max_bytes {
            return Err(too_large(max_bytes));
        }

        let request = UploadRequest::new(filename, data);
        return Ok(match content_type {
            Some(ct) => request.with_content_type(ct),
            None => request,
        });
    }

    tracing::warn!("Upload request with no file field");
    Err(ResponseEnvelope::failure(
        ErrorKind::BadRequest,
        "no file provided",
    ))
}

fn multipart_failure(e: MultipartError) -> ResponseEnvelope {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(error = %e, "Upload exceeds body limit");
        return ResponseEnvelope::failure(ErrorKind::PayloadTooLarge, "file too large");
    }

    tracing::warn!(error = %e, "Failed to read multipart");
    ResponseEnvelope::failure(
        ErrorKind::BadRequest,
        format!("failed to read multipart: {}", e.body_text()),
    )
}

fn too_large(max_bytes: usize) -> ResponseEnvelope {
    ResponseEnvelope::failure(
        ErrorKind::PayloadTooLarge,
        format!("file too large: limit is {max_bytes} bytes"),
    )
}
