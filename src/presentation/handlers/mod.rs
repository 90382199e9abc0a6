mod envelope;
mod fallback;
mod health;
mod process;
mod supported_types;

pub use envelope::{envelope_response, status_for};
pub use fallback::not_found_handler;
pub use health::{HealthResponse, SERVICE_NAME, health_handler};
pub use process::process_handler;
pub use supported_types::{SupportedTypesResponse, supported_types_handler};
