use std::path::PathBuf;
use std::time::Duration;

use config::{Config, File};
use serde::Deserialize;

use crate::domain::CleanupPolicy;

use super::Environment;

const ENV_PREFIX: &str = "APP";
const ENV_PREFIX_SEPARATOR: &str = "_";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("{0}")]
    Environment(String),
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub processing: ProcessingSettings,
    pub vision: VisionSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5050,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub upload_dir: PathBuf,
    pub processed_dir: PathBuf,
    pub max_upload_size_bytes: usize,
    pub cleanup_policy: CleanupPolicy,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./uploads"),
            processed_dir: PathBuf::from("./processed"),
            max_upload_size_bytes: 100 * 1024 * 1024,
            cleanup_policy: CleanupPolicy::Always,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProcessingSettings {
    pub timeout_seconds: u64,
}

impl ProcessingSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            timeout_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VisionSettings {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for VisionSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://yunwu.ai/v1".to_string(),
            model: "gemini-2.0-flash-thinking-exp-01-21".to_string(),
            max_tokens: 4096,
            temperature: 0.1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
    pub enable_json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info,docdispatch=debug,tower_http=debug".to_string(),
            enable_json: false,
        }
    }
}

impl Settings {
    /// Reads `.env`, then `appsettings.<env>.toml`, then `APP_*` overrides such as
    /// `APP_SERVER__PORT`.
    pub fn load() -> Result<(Environment, Self), SettingsError> {
        dotenvy::dotenv().ok();

        let environment = Environment::from_env().map_err(SettingsError::Environment)?;
        let settings = Self::load_for(environment)?;
        Ok((environment, settings))
    }

    pub fn load_for(environment: Environment) -> Result<Self, SettingsError> {
        let configuration = Config::builder()
            .add_source(
                File::with_name(&format!("appsettings.{}", environment.as_str())).required(false),
            )
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_PREFIX_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?;

        let settings: Settings = configuration.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.storage.max_upload_size_bytes == 0 {
            return Err(SettingsError::Invalid(
                "storage.max_upload_size_bytes must be greater than zero".to_string(),
            ));
        }
        if self.processing.timeout_seconds == 0 {
            return Err(SettingsError::Invalid(
                "processing.timeout_seconds must be greater than zero".to_string(),
            ));
        }
        if self.storage.upload_dir.as_os_str().is_empty()
            || self.storage.processed_dir.as_os_str().is_empty()
        {
            return Err(SettingsError::Invalid(
                "storage directories must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
