//! Configuration management for moscow-time
//!
//! Parses an optional TOML configuration file and provides typed access to
//! settings. Every section has defaults, so the service runs without a file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that overrides `storage.visits_file`
pub const VISITS_FILE_ENV: &str = "VISITS_FILE";

/// Default location of the persisted visit counter
pub const DEFAULT_VISITS_FILE: &str = "/data/visits";

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

/// Application identity
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Value of the `app_name` label on every request metric
    #[serde(default = "default_app_name")]
    pub name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

fn default_app_name() -> String {
    "moscow_time".to_string()
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    #[serde(default = "default_visits_file")]
    pub visits_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            visits_file: default_visits_file(),
        }
    }
}

fn default_visits_file() -> PathBuf {
    PathBuf::from(DEFAULT_VISITS_FILE)
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            crate::error::AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        let config: Self = toml::from_str(&content).map_err(|source| {
            crate::error::AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        config
            .validate()
            .map_err(|e| crate::error::AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    /// Load configuration from `path` if given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> crate::error::AppResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                tracing::debug!("No config file given, using built-in defaults");
                Ok(Self::default())
            }
        }
    }

    /// Apply the visit file override taken from [`VISITS_FILE_ENV`]
    ///
    /// Empty values are ignored so an exported-but-blank variable does not
    /// point the store at the current directory.
    pub fn apply_visits_file_override(&mut self, value: Option<String>) {
        match value {
            Some(path) if !path.trim().is_empty() => {
                tracing::debug!(
                    visits_file = %path,
                    "Visit file path overridden from environment"
                );
                self.storage.visits_file = PathBuf::from(path);
            }
            _ => {}
        }
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()`; call it explicitly when building a Config by
    /// hand.
    pub fn validate(&self) -> crate::error::AppResult<()> {
        if self.app.name.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "app.name must not be empty (it labels every request metric)".to_string(),
            ));
        }

        if self.storage.visits_file.as_os_str().is_empty() {
            return Err(crate::error::AppError::Config(
                "storage.visits_file must not be empty".to_string(),
            ));
        }

        if self.observability.log_level.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "observability.log_level must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
