use std::collections::BTreeMap;

use axum::Json;
use axum::response::IntoResponse;
use serde::Serialize;

use crate::domain::{DocumentType, supported_extensions};

#[derive(Serialize)]
pub struct SupportedTypesResponse {
    pub success: bool,
    pub supported_extensions: Vec<&'static str>,
    pub file_types: BTreeMap<DocumentType, &'static [&'static str]>,
}

/// Lists what the classifier recognises, independent of which processors
/// are registered.
pub async fn supported_types_handler() -> impl IntoResponse {
    Json(SupportedTypesResponse {
        success: true,
        supported_extensions: supported_extensions(),
        file_types: DocumentType::PROCESSABLE
            .iter()
            .map(|t| (*t, t.extensions()))
            .collect(),
    })
}
