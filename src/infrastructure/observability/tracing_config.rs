use crate::presentation::config::{Environment, LoggingSettings};

pub const DEFAULT_FILTER: &str = "info,docdispatch=debug,tower_http=debug";

/// Subscriber options resolved from settings and the process environment.
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub environment: Environment,
    pub filter: String,
    pub json_format: bool,
}

impl TracingConfig {
    /// `LOG_FORMAT=json` forces JSON output regardless of settings.
    pub fn from_settings(environment: Environment, logging: &LoggingSettings) -> Self {
        let json_from_env = std::env::var("LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let filter = if logging.level.trim().is_empty() {
            DEFAULT_FILTER.to_string()
        } else {
            logging.level.clone()
        };

        Self {
            environment,
            filter,
            json_format: logging.enable_json || json_from_env,
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self::from_settings(Environment::Local, &LoggingSettings::default())
    }
}
