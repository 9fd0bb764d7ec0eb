//! Configuration file for the command-line client.
//!
//! All default values live in `config.default.toml`, embedded at compile
//! time. A user file is deep-merged on top of it, so it only needs the keys
//! it changes.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use serde::{Deserialize, Serialize};
use url::Url;

use crate::log_level::{LogLevel, TargetLevel};

/// Embedded copy of the default configuration.
pub const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Environment variable overriding `api.base_url`.
pub const API_URL_ENV: &str = "SOCIAL_API_URL";

/// Error that can occur when reading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigReadError {
    /// The file did not exist or could not be read.
    #[error("config file not found: {0}")]
    ConfigFileNotFound(#[from] std::io::Error),
    /// The TOML was syntactically invalid or did not match the expected shape.
    #[error("config file is not valid TOML: {0}")]
    ConfigFileNotValid(#[from] toml::de::Error),
    /// Failed to merge defaults with overrides.
    #[error("failed to merge embedded and user TOML: {0}")]
    ConfigMergeError(String),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ApiToml {
    pub base_url: Url,
    pub request_timeout_s: u64,
}

impl ApiToml {
    /// `None` when the timeout is disabled.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_s > 0).then(|| Duration::from_secs(self.request_timeout_s))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionToml {
    pub file: PathBuf,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LoggingToml {
    pub level: LogLevel,
    #[serde(default)]
    pub module_levels: Vec<TargetLevel>,
}

/// The whole client configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ConfigToml {
    /// Where the service lives.
    pub api: ApiToml,
    /// Where the session is persisted.
    pub session: SessionToml,
    /// Log verbosity.
    pub logging: LoggingToml,
}

impl ConfigToml {
    /// The embedded defaults alone.
    pub fn defaults() -> Result<Self, ConfigReadError> {
        Self::from_str_with_defaults("")
    }

    /// Read and parse a configuration file, overlaying it on top of the embedded defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigReadError> {
        let raw = fs::read_to_string(path)?;
        Self::from_str_with_defaults(&raw)
    }

    /// Parse a raw TOML string, overlaying it on top of the embedded defaults.
    pub fn from_str_with_defaults(raw: &str) -> Result<Self, ConfigReadError> {
        let default_val: toml::Value = DEFAULT_CONFIG.parse()?;
        let user_val: toml::Value = raw.parse()?;

        let merged_val = serde_toml_merge::merge(default_val, user_val)
            .map_err(|e| ConfigReadError::ConfigMergeError(e.to_string()))?;

        Ok(merged_val.try_into()?)
    }

    /// Load the configuration the way the binary does.
    ///
    /// An explicit `path` must exist. Without one, `<config dir>/social/config.toml`
    /// is used when present and the defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigReadError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_file().filter(|p| p.is_file()) {
                Some(path) => Self::from_file(path),
                None => Self::defaults(),
            },
        }
    }

    /// Session file, resolving the empty default against the data directory.
    pub fn session_file(&self) -> Option<PathBuf> {
        if self.session.file.as_os_str().is_empty() {
            dirs::data_dir().map(|dir| dir.join("social").join("session.json"))
        } else {
            Some(self.session.file.clone())
        }
    }
}

impl FromStr for ConfigToml {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("social").join("config.toml"))
}
