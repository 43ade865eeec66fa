//! Engine configuration
//!
//! Loaded from a JSON file. Every field has a default, so an empty object is
//! a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::UnknownOperatorPolicy;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::stats::NOT_AVAILABLE;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        "TABLEDECK_CONFIG_ERROR"
    }
}

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// JSON file holding the column definitions
    #[serde(default)]
    pub columns_path: Option<PathBuf>,

    /// Handling of filter rules with an unknown operator
    #[serde(default)]
    pub unknown_operator_policy: UnknownOperatorPolicy,

    /// Minimum log severity (trace, info, warn, error, fatal)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Field delimiter for delimited export
    #[serde(default = "default_export_delimiter")]
    pub export_delimiter: char,

    /// Text shown for aggregates that do not apply
    #[serde(default = "default_not_available")]
    pub not_available: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_export_delimiter() -> char {
    ','
}

fn default_not_available() -> String {
    NOT_AVAILABLE.to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            columns_path: None,
            unknown_operator_policy: UnknownOperatorPolicy::default(),
            log_level: default_log_level(),
            export_delimiter: default_export_delimiter(),
            not_available: default_not_available(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;

        let path_str = path.display().to_string();
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("log_level", config.log_level.as_str()),
                ("path", path_str.as_str()),
            ],
        );

        Ok(config)
    }

    /// Checks field values that serde cannot
    pub fn validate(&self) -> ConfigResult<()> {
        if Severity::parse(&self.log_level).is_none() {
            return Err(ConfigError::Invalid(format!(
                "Unknown log_level '{}'",
                self.log_level
            )));
        }

        if !self.export_delimiter.is_ascii() || self.export_delimiter.is_ascii_control() {
            return Err(ConfigError::Invalid(format!(
                "export_delimiter must be a printable ASCII character, got {:?}",
                self.export_delimiter
            )));
        }

        if self.not_available.trim().is_empty() {
            return Err(ConfigError::Invalid("not_available must not be empty".into()));
        }

        Ok(())
    }

    /// Minimum log severity; WARN if the level is not recognized
    pub fn severity(&self) -> Severity {
        Severity::parse(&self.log_level).unwrap_or(Severity::Warn)
    }

    /// Export delimiter as a single byte
    pub fn delimiter_byte(&self) -> u8 {
        if self.export_delimiter.is_ascii() {
            self.export_delimiter as u8
        } else {
            b','
        }
    }

    /// Applies process-wide settings (log severity)
    pub fn apply(&self) {
        Logger::set_min_severity(self.severity());
    }
}
