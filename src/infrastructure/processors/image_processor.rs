use std::sync::Arc;

use async_trait::async_trait;

use crate::application::ports::{DocumentProcessor, ProcessorError, VisionClient};
use crate::domain::{ProcessorResult, WorkingFile};

use super::working_file_reader::read_non_empty;

const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

pub struct ImageProcessor {
    vision: Arc<dyn VisionClient>,
}

impl ImageProcessor {
    pub fn new(vision: Arc<dyn VisionClient>) -> Self {
        Self { vision }
    }
}

pub fn mime_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        Some(".png") => "image/png",
        Some(".jpg" | ".jpeg") => "image/jpeg",
        Some(".gif") => "image/gif",
        Some(".webp") => "image/webp",
        Some(".bmp") => "image/bmp",
        Some(".tif" | ".tiff") => "image/tiff",
        _ => DEFAULT_IMAGE_MIME,
    }
}

#[async_trait]
impl DocumentProcessor for ImageProcessor {
    #[tracing::instrument(
        skip(self, file),
        fields(filename = %file.original_filename, model = self.vision.model())
    )]
    async fn process(&self, file: &WorkingFile) -> Result<ProcessorResult, ProcessorError> {
        let data = read_non_empty(file).await?;
        let mime_type = mime_type_for(file.extension().as_deref());

        let text = self.vision.extract_markdown(&data, mime_type).await?;
        let content = text.trim();
        if content.is_empty() {
            return Err(ProcessorError::NoContent(file.original_filename.clone()));
        }

        tracing::info!(chars = content.len(), "Image text extracted");

        Ok(ProcessorResult::success(content)
            .with_metadata("mime_type", mime_type)
            .with_metadata("model_used", self.vision.model())
            .with_metadata("image_bytes", data.len()))
    }
}
