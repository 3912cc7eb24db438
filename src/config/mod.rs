//! Configuration loading and management

use crate::core::error::ConfigError;
use crate::core::query::DEFAULT_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8181;
pub const DEFAULT_CONTEXT_PATH: &str = "/probe-client-adapter";
pub const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 30;

/// Where probe data comes from, as written in the configuration file
///
/// Exactly one of the two fields must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Exported archive (zip file or unpacked directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub archive: Option<PathBuf>,

    /// Base URL of a live probe, e.g. `http://host:8080/app/weld-probe`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remote: Option<String>,
}

/// Resolved data source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Archive(PathBuf),
    Remote(String),
}

/// Complete configuration of the probe adapter
///
/// # Example
/// ```yaml
/// host: 0.0.0.0
/// port: 8181
/// context_path: /probe-client-adapter
/// default_page_size: 50
/// source:
///   archive: ./weld-probe-export.zip
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    /// Interface the listener binds to
    pub host: String,

    pub port: u16,

    /// Path the probe resources are mounted under
    pub context_path: String,

    /// Page size used when a request does not carry `pageSize`
    pub default_page_size: usize,

    pub source: SourceConfig,

    /// Request timeout for a remote source
    pub remote_timeout_secs: u64,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            context_path: DEFAULT_CONTEXT_PATH.to_string(),
            default_page_size: DEFAULT_PAGE_SIZE,
            source: SourceConfig::default(),
            remote_timeout_secs: DEFAULT_REMOTE_TIMEOUT_SECS,
        }
    }
}

impl AdapterConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })
    }

    /// Check the configuration before the server starts
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.data_source()?;
        if self.port == 0 {
            return Err(invalid("port", "must be greater than 0"));
        }
        if self.host.trim().is_empty() {
            return Err(invalid("host", "must not be empty"));
        }
        if !self.context_path.starts_with('/') {
            return Err(invalid("context_path", "must start with '/'"));
        }
        if self.remote_timeout_secs == 0 {
            return Err(invalid("remote_timeout_secs", "must be greater than 0"));
        }
        Ok(())
    }

    /// The single configured data source
    pub fn data_source(&self) -> Result<DataSource, ConfigError> {
        match (&self.source.archive, &self.source.remote) {
            (Some(path), None) => Ok(DataSource::Archive(path.clone())),
            (None, Some(url)) if !url.trim().is_empty() => Ok(DataSource::Remote(url.clone())),
            _ => Err(ConfigError::AmbiguousSource),
        }
    }

    /// `host:port` for the listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Context path without a trailing slash, empty for the root
    pub fn normalized_context_path(&self) -> &str {
        self.context_path.trim_end_matches('/')
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }
}

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: message.to_string(),
    }
}
