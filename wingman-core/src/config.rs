//! Configuration types
//!
//! Values come from three layers, later ones winning: built-in defaults, an
//! optional TOML file, and `WINGMAN_*` environment variables.

use crate::{ConfigError, WingmanResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_DATA_DIR: &str = "WINGMAN_DATA_DIR";
pub const ENV_PRETTY_JSON: &str = "WINGMAN_PRETTY_JSON";
pub const ENV_LOG_FILTER: &str = "WINGMAN_LOG_FILTER";
pub const ENV_LOG_JSON: &str = "WINGMAN_LOG_JSON";

/// Master configuration struct.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WingmanConfig {
    /// Directory holding one JSON file per registry.
    pub data_dir: PathBuf,
    /// Indent saved JSON.
    pub pretty_json: bool,
    /// `tracing_subscriber::EnvFilter` directive. `RUST_LOG` takes precedence.
    pub log_filter: String,
    /// Emit logs as JSON lines instead of plain text.
    pub log_json: bool,
}

impl Default for WingmanConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            pretty_json: true,
            log_filter: "wingman=info".to_string(),
            log_json: false,
        }
    }
}

impl WingmanConfig {
    /// Resolve the full configuration: defaults, then `path` if given, then
    /// the process environment. The result is validated.
    pub fn load(path: Option<&Path>) -> WingmanResult<Self> {
        let base = match path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };
        let config = base.with_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML file. Missing keys fall back to defaults.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })
    }

    /// Apply overrides read through `lookup`, which maps a variable name to
    /// its value.
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(value) = lookup(ENV_PRETTY_JSON) {
            self.pretty_json = parse_bool(ENV_PRETTY_JSON, &value)?;
        }
        if let Some(filter) = lookup(ENV_LOG_FILTER) {
            self.log_filter = filter;
        }
        if let Some(value) = lookup(ENV_LOG_JSON) {
            self.log_json = parse_bool(ENV_LOG_JSON, &value)?;
        }
        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "data_dir".to_string(),
                value: String::new(),
                reason: "data_dir must not be empty".to_string(),
            });
        }

        if self.log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "log_filter".to_string(),
                value: self.log_filter.clone(),
                reason: "log_filter must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

fn parse_bool(field: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            field: field.to_string(),
            value: value.to_string(),
            reason: "expected a boolean".to_string(),
        }),
    }
}
