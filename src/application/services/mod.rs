mod dispatch_error;
mod dispatch_pipeline;
mod error_detail;
mod processor_registry;

pub use dispatch_error::DispatchError;
pub use dispatch_pipeline::{DispatchPipeline, RequestState};
pub use error_detail::sanitize_error_detail;
pub use processor_registry::{
    ConfigurationError, ProcessorRegistry, ProcessorRegistryBuilder, UnsupportedTypeError,
};
