//! Server configuration for mcpgate.
//!
//! Values come from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. An optional JSON file named by `MCPGATE_CONFIG`
//! 3. Environment variables (after loading `.env`)
//!
//! | Variable | Field | Default |
//! |----------|-------|---------|
//! | `HOST` | `host` | `0.0.0.0` |
//! | `PORT` | `port` | `3333` |
//! | `DATABASE_URL` | `database_url` | `data/mcpgate.db` |
//! | `DATABASE_READ_ONLY` | `database_read_only` | `false` |
//!
//! # Example
//!
//! ```rust
//! use mcpgate_config::ServerConfig;
//!
//! let config = ServerConfig::default()
//!     .apply_overrides(|key| (key == "PORT").then(|| "8080".to_string()))
//!     .unwrap();
//!
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.bind_addr(), "0.0.0.0:8080");
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

pub const CONFIG_PATH_VAR: &str = "MCPGATE_CONFIG";

/// Errors that can occur when loading configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// Failed to read a configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse JSON configuration.
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// An environment variable holds a value of the wrong shape.
    #[error("Invalid value '{value}' for {key}: {message}")]
    InvalidValue {
        key: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    /// Creates an IO error with path context.
    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    fn invalid(key: &str, value: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            message: message.into(),
        }
    }
}

/// Runtime settings for the HTTP server and its data store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Connection string for the SQLite store (path or `:memory:`).
    pub database_url: String,
    /// Open the store with writes disabled.
    pub database_read_only: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3333,
            database_url: "data/mcpgate.db".to_string(),
            database_read_only: false,
        }
    }
}

impl ServerConfig {
    /// Loads `.env`, the optional config file and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let base = match std::env::var(CONFIG_PATH_VAR) {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        base.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Loads a configuration from a JSON file. Missing fields take defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::io(path.display().to_string(), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Overrides fields from a key lookup such as the process environment.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|e: std::num::ParseIntError| ConfigError::invalid("PORT", &port, e.to_string()))?;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(flag) = lookup("DATABASE_READ_ONLY") {
            self.database_read_only = parse_bool("DATABASE_READ_ONLY", &flag)?;
        }
        Ok(self)
    }

    /// Socket address string for the listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::invalid(key, value, "expected a boolean")),
    }
}
