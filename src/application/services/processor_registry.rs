use std::collections::BTreeMap;
use std::sync::Arc;

use crate::application::ports::DocumentProcessor;
use crate::domain::DocumentType;

/// Startup-time collection of processors. Consumed by [`Self::build`].
#[derive(Default)]
pub struct ProcessorRegistryBuilder {
    processors: BTreeMap<DocumentType, Arc<dyn DocumentProcessor>>,
}

impl ProcessorRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        document_type: DocumentType,
        processor: Arc<dyn DocumentProcessor>,
    ) -> Result<&mut Self, ConfigurationError> {
        if document_type == DocumentType::Unsupported {
            return Err(ConfigurationError::UnsupportedRegistration);
        }
        if self.processors.contains_key(&document_type) {
            return Err(ConfigurationError::DuplicateProcessor(document_type));
        }

        tracing::debug!(document_type = %document_type, "Processor registered");
        self.processors.insert(document_type, processor);
        Ok(self)
    }

    pub fn build(self) -> Result<ProcessorRegistry, ConfigurationError> {
        if self.processors.is_empty() {
            return Err(ConfigurationError::EmptyRegistry);
        }

        Ok(ProcessorRegistry {
            processors: self.processors,
        })
    }
}

/// Read-only mapping from document type to processor, shared across requests.
pub struct ProcessorRegistry {
    processors: BTreeMap<DocumentType, Arc<dyn DocumentProcessor>>,
}

impl ProcessorRegistry {
    pub fn builder() -> ProcessorRegistryBuilder {
        ProcessorRegistryBuilder::new()
    }

    pub fn lookup(
        &self,
        document_type: DocumentType,
    ) -> Result<Arc<dyn DocumentProcessor>, UnsupportedTypeError> {
        self.processors
            .get(&document_type)
            .cloned()
            .ok_or(UnsupportedTypeError(document_type))
    }

    pub fn registered_types(&self) -> Vec<DocumentType> {
        self.processors.keys().copied().collect()
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no processor registered for document type {0}")]
pub struct UnsupportedTypeError(pub DocumentType);

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("a processor is already registered for document type {0}")]
    DuplicateProcessor(DocumentType),
    #[error("processors cannot be registered for the unsupported document type")]
    UnsupportedRegistration,
    #[error("no processors registered")]
    EmptyRegistry,
}
