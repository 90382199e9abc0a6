mod document_processor;
mod vision_client;
mod working_store;

pub use document_processor::{DocumentProcessor, ProcessorError};
pub use vision_client::{VisionClient, VisionClientError};
pub use working_store::{StorageError, WorkingStore};
