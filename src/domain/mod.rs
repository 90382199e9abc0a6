mod cleanup_policy;
mod document_type;
mod processor_result;
mod response_envelope;
mod upload_request;
mod working_file;

pub use cleanup_policy::CleanupPolicy;
pub use document_type::{
    DocumentType, classify, classify_with_hints, extension_of, supported_extensions,
};
pub use processor_result::{Metadata, ProcessorResult};
pub use response_envelope::{ErrorKind, PROCESSING_FAILED_PREFIX, ResponseEnvelope, normalize};
pub use upload_request::UploadRequest;
pub use working_file::{WorkingFile, safe_stem};
