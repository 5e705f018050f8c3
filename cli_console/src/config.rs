//! Console configuration
//!
//! Configuration is a small versioned document persisted as JSON. A
//! missing file means defaults; an unsupported version is refused
//! rather than guessed at.

use std::env;

use console_log::LogLevel;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or saving configuration
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Failed to serialize configuration
    #[error("Failed to serialize configuration: {0}")]
    Serialization(String),

    /// Failed to deserialize configuration
    #[error("Failed to deserialize configuration: {0}")]
    Deserialization(String),

    /// Unsupported configuration version
    #[error("Unsupported configuration version: {0}")]
    UnsupportedVersion(u32),
}

/// Log level as it appears in the configuration document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevelSetting {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevelSetting> for LogLevel {
    fn from(setting: LogLevelSetting) -> Self {
        match setting {
            LogLevelSetting::Debug => LogLevel::Debug,
            LogLevelSetting::Info => LogLevel::Info,
            LogLevelSetting::Warn => LogLevel::Warn,
            LogLevelSetting::Error => LogLevel::Error,
        }
    }
}

/// Console configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Version of the configuration format
    pub version: u32,
    /// User the session belongs to; the environment decides when absent
    pub user: Option<String>,
    /// Directory under which per-user home directories live
    pub home_root: String,
    /// Endpoint of the secondary store, when one is attached
    pub remote_endpoint: Option<String>,
    /// Minimum level the console logs at
    pub log_level: LogLevelSetting,
}

impl ConsoleConfig {
    /// Current version of the configuration format
    pub const CURRENT_VERSION: u32 = 1;

    /// Decodes a configuration document, refusing unknown versions
    pub fn from_json_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: ConsoleConfig = serde_json::from_slice(bytes)
            .map_err(|e| ConfigError::Deserialization(e.to_string()))?;
        if config.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    /// Encodes the configuration document
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        serde_json::to_vec_pretty(self).map_err(|e| ConfigError::Serialization(e.to_string()))
    }

    /// Returns the user the session runs as
    ///
    /// Falls back to the `USER` then `USERNAME` environment variables,
    /// then to `anonymous`.
    pub fn resolved_user(&self) -> String {
        self.user
            .clone()
            .or_else(|| env::var("USER").ok())
            .or_else(|| env::var("USERNAME").ok())
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            user: None,
            home_root: "/usr".to_string(),
            remote_endpoint: None,
            log_level: LogLevelSetting::Info,
        }
    }
}
