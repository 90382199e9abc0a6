use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use pdf_oxide::PdfDocument;

use crate::application::ports::{DocumentProcessor, ProcessorError, VisionClient};
use crate::domain::{ProcessorResult, WorkingFile};

use super::pdf_rasterizer::{RasterOptions, rasterize};
use super::text_sanitizer::sanitize_extracted_text;
use super::working_file_reader::{ensure_non_empty, join_error};

const SCANNED_SAMPLE_PAGES: usize = 3;
const SCANNED_MIN_CHARS_PER_PAGE: f64 = 100.0;
const PAGE_SEPARATOR: &str = "\n\n---\n\n";

/// Text-layer extraction, with page OCR through the vision model for PDFs
/// that are scans.
#[derive(Default)]
pub struct PdfProcessor {
    vision: Option<Arc<dyn VisionClient>>,
}

impl PdfProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_vision(vision: Arc<dyn VisionClient>) -> Self {
        Self {
            vision: Some(vision),
        }
    }

    fn extract_pages(path: &Path) -> Result<Vec<String>, ProcessorError> {
        let mut doc = PdfDocument::open(path)
            .map_err(|e| ProcessorError::ExtractionFailed(format!("failed to parse PDF: {e}")))?;

        let page_count = doc.page_count().map_err(|e| {
            ProcessorError::ExtractionFailed(format!("failed to read page count: {e}"))
        })?;

        let mut pages = Vec::with_capacity(page_count);
        for page_index in 0..page_count {
            pages.push(doc.extract_text(page_index).unwrap_or_default());
        }

        Ok(pages)
    }

    async fn ocr_pages(
        &self,
        vision: &Arc<dyn VisionClient>,
        file: &WorkingFile,
    ) -> Result<String, ProcessorError> {
        let data = tokio::fs::read(&file.path).await?;
        let pages =
            tokio::task::spawn_blocking(move || rasterize(&data, RasterOptions::default()))
                .await
                .map_err(join_error)??;

        tokio::fs::create_dir_all(&file.artifact_dir).await?;

        let total = pages.len();
        let mut sections = Vec::with_capacity(total);

        for page in &pages {
            let page_number = page.number;
            let page_path = file.artifact_dir.join(format!("page-{page_number}.png"));
            if let Err(e) = tokio::fs::write(&page_path, &page.png).await {
                tracing::warn!(page_number, error = %e, "Failed to save page image");
            }

            match vision.extract_markdown(&page.png, "image/png").await {
                Ok(text) if !text.trim().is_empty() => {
                    tracing::debug!(page_number, total, "Page OCR complete");
                    sections.push(text.trim().to_string());
                }
                Ok(_) => tracing::warn!(page_number, "No text returned for page"),
                Err(e) => tracing::warn!(page_number, error = %e, "Page OCR failed"),
            }
        }

        Ok(sections.join(PAGE_SEPARATOR))
    }
}

/// A PDF is treated as a scan when its first pages carry almost no text.
pub fn is_scanned(pages: &[String]) -> bool {
    let sample = pages.len().min(SCANNED_SAMPLE_PAGES);
    if sample == 0 {
        return true;
    }

    let chars: usize = pages[..sample]
        .iter()
        .map(|p| p.trim().chars().count())
        .sum();
    (chars as f64 / sample as f64) < SCANNED_MIN_CHARS_PER_PAGE
}

#[async_trait]
impl DocumentProcessor for PdfProcessor {
    #[tracing::instrument(skip(self, file), fields(filename = %file.original_filename))]
    async fn process(&self, file: &WorkingFile) -> Result<ProcessorResult, ProcessorError> {
        ensure_non_empty(file).await?;

        let path = file.path.clone();
        let pages = tokio::task::spawn_blocking(move || Self::extract_pages(&path))
            .await
            .map_err(join_error)??;

        let page_count = pages.len();
        let scanned = is_scanned(&pages);
        tracing::info!(page_count, scanned, "PDF text extraction complete");

        let text_layer = pages
            .iter()
            .map(|p| sanitize_extracted_text(p))
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n");

        let content = match &self.vision {
            Some(vision) if scanned => match self.ocr_pages(vision, file).await {
                Ok(text) if !text.trim().is_empty() => text,
                Ok(_) => {
                    tracing::warn!("Page OCR produced no text, using text layer");
                    text_layer
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Page OCR unavailable, using text layer");
                    text_layer
                }
            },
            _ => text_layer,
        };

        if content.trim().is_empty() {
            return Err(ProcessorError::NoContent(file.original_filename.clone()));
        }

        Ok(ProcessorResult::success(content)
            .with_metadata("page_count", page_count)
            .with_metadata("is_scanned", scanned))
    }
}
