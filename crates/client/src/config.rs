// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Client configuration.
//!
//! Read from a TOML file with four optional tables:
//!
//! ```toml
//! [api]
//! base_url = "https://invitationweb.app"
//! timeout_secs = 10
//!
//! [retry]
//! max_retries = 3
//! base_delay_ms = 1000
//! max_delay_ms = 10000
//! jitter = 0.1
//!
//! [sync]
//! max_attempts = 3
//!
//! [storage]
//! engine = "sqlite"
//! path = "/path/to/store.db"
//! fallback = true
//! ```
//!
//! `IW_API_BASE_URL` and `IW_STORAGE_PATH` override the file.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use iw_core::StorageConfig;

use crate::endpoints::DEFAULT_BASE_URL;
use crate::env;
use crate::http::RetryPolicy;
use crate::sync::SyncConfig;

const CONFIG_DIR_NAME: &str = "invitationweb";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// The `[api]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Deadline for a single request attempt.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Full client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub retry: RetryPolicy,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl Config {
    /// Loads `path` and applies environment overrides.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let config = Config::load_file(path)?
            .apply_overrides(env::api_base_url(), env::storage_path());
        config.validate()?;
        Ok(config)
    }

    /// Loads `path` without consulting the environment.
    ///
    /// A missing file yields the defaults.
    pub fn load_file(path: &Path) -> ConfigResult<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Config::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Config::parse(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Replaces the base URL and storage path where given.
    pub fn apply_overrides(mut self, base_url: Option<String>, storage_path: Option<PathBuf>) -> Self {
        if let Some(url) = base_url {
            self.api.base_url = url;
        }
        if let Some(path) = storage_path {
            self.storage.path = path;
        }
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "api.base_url '{}' must start with http:// or https://",
                url
            )));
        }
        if self.api.timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "api.timeout_secs must be at least 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.retry.jitter) {
            return Err(ConfigError::Invalid(format!(
                "retry.jitter {} must be between 0 and 1",
                self.retry.jitter
            )));
        }
        if self.retry.base_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::Invalid(
                "retry.base_delay_ms must not exceed retry.max_delay_ms".to_string(),
            ));
        }
        if self.sync.max_attempts == 0 {
            return Err(ConfigError::Invalid(
                "sync.max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Default config location: `<config dir>/invitationweb/config.toml`.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
