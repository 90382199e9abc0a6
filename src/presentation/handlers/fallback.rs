use axum::Json;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};

use crate::domain::{ErrorKind, ResponseEnvelope};

pub async fn not_found_handler(uri: Uri) -> Response {
    tracing::debug!(path = %uri.path(), "No route matched");
    (
        StatusCode::NOT_FOUND,
        Json(ResponseEnvelope::failure(
            ErrorKind::BadRequest,
            format!("no route for {}", uri.path()),
        )),
    )
        .into_response()
}
