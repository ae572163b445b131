//! Configuration module for File Hub.

use serde::Deserialize;
use std::path::Path;

use crate::{FileHubError, Result};

/// Query keys with a fixed meaning on the list endpoint.
pub const RESERVED_QUERY_KEYS: [&str; 5] = ["_page", "_limit", "_sort", "_order", "q"];

/// Upper bound for `files.max_upload_size_mb`.
pub const MAX_UPLOAD_SIZE_MB: u64 = 4096;

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4040
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// JSON document database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DataConfig {
    /// Path to the JSON database file.
    #[serde(default = "default_data_path")]
    pub path: String,
    /// Collections declared at startup (created empty when absent).
    #[serde(default)]
    pub collections: Vec<String>,
    /// Item fields that can be filtered by substring on the list endpoint.
    #[serde(default = "default_filter_fields")]
    pub filter_fields: Vec<String>,
}

fn default_data_path() -> String {
    "data.json".to_string()
}

fn default_filter_fields() -> Vec<String> {
    vec!["nome".to_string()]
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            path: default_data_path(),
            collections: vec![],
            filter_fields: default_filter_fields(),
        }
    }
}

/// Upload storage configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Path to the upload root directory.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
}

fn default_storage_path() -> String {
    "uploads".to_string()
}

fn default_max_upload_size() -> u64 {
    10
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            max_upload_size_mb: default_max_upload_size(),
        }
    }
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/filehub.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. An empty list allows every origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Document database configuration.
    #[serde(default)]
    pub data: DataConfig,
    /// Upload storage configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FileHubError::Io)?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FileHubError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `PORT`: Override the listening port
    /// - `FILEHUB_DATA_PATH`: Override the JSON database path
    pub fn apply_env_overrides(&mut self) {
        if let Ok(port) = std::env::var("PORT") {
            match port.trim().parse::<u16>() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid PORT override"),
            }
        }

        if let Ok(path) = std::env::var("FILEHUB_DATA_PATH") {
            if !path.is_empty() {
                self.data.path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.files.max_upload_size_mb == 0 {
            return Err(FileHubError::Config(
                "files.max_upload_size_mb must be greater than zero".to_string(),
            ));
        }
        if self.files.max_upload_size_mb > MAX_UPLOAD_SIZE_MB {
            return Err(FileHubError::Config(format!(
                "files.max_upload_size_mb must be at most {MAX_UPLOAD_SIZE_MB}"
            )));
        }

        for field in &self.data.filter_fields {
            if field.is_empty() {
                return Err(FileHubError::Config(
                    "data.filter_fields must not contain empty names".to_string(),
                ));
            }
            if RESERVED_QUERY_KEYS.contains(&field.as_str()) {
                return Err(FileHubError::Config(format!(
                    "data.filter_fields entry \"{field}\" collides with a reserved query key"
                )));
            }
        }

        Ok(())
    }
}
