use std::sync::Arc;

use crate::application::ports::{VisionClient, VisionClientError};
use crate::application::services::{ConfigurationError, ProcessorRegistry};
use crate::domain::DocumentType;
use crate::infrastructure::vision::OpenAiVisionClient;
use crate::presentation::config::VisionSettings;

use super::excel_processor::ExcelProcessor;
use super::html_processor::HtmlProcessor;
use super::image_processor::ImageProcessor;
use super::pdf_processor::PdfProcessor;

#[derive(Debug, thiserror::Error)]
pub enum ProcessorFactoryError {
    #[error("registry configuration failed: {0}")]
    Configuration(#[from] ConfigurationError),
    #[error("vision client initialization failed: {0}")]
    Vision(#[from] VisionClientError),
}

pub struct ProcessorFactory;

impl ProcessorFactory {
    pub fn create(settings: &VisionSettings) -> Result<ProcessorRegistry, ProcessorFactoryError> {
        let vision = match settings.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => {
                tracing::info!(
                    model = %settings.model,
                    base_url = %settings.base_url,
                    "Loading vision client"
                );
                let client: Arc<dyn VisionClient> = Arc::new(OpenAiVisionClient::new(
                    &settings.base_url,
                    &settings.model,
                    key,
                    settings.max_tokens,
                    settings.temperature,
                )?);
                Some(client)
            }
            _ => {
                tracing::warn!(
                    "No vision API key configured; image uploads are unsupported and scanned PDFs are not OCR'd"
                );
                None
            }
        };

        Self::with_vision(vision)
    }

    /// Builds the registry around an already constructed vision client.
    pub fn with_vision(
        vision: Option<Arc<dyn VisionClient>>,
    ) -> Result<ProcessorRegistry, ProcessorFactoryError> {
        let mut builder = ProcessorRegistry::builder();

        let pdf = match &vision {
            Some(client) => PdfProcessor::with_vision(Arc::clone(client)),
            None => PdfProcessor::new(),
        };
        builder
            .register(DocumentType::Pdf, Arc::new(pdf))?
            .register(DocumentType::Excel, Arc::new(ExcelProcessor::new()))?
            .register(DocumentType::Html, Arc::new(HtmlProcessor::new()))?;

        if let Some(client) = vision {
            builder.register(DocumentType::Image, Arc::new(ImageProcessor::new(client)))?;
        }

        let registry = builder.build()?;
        tracing::info!(
            registered = ?registry.registered_types(),
            "Processor registry ready"
        );
        Ok(registry)
    }
}
