//! Process configuration.
//!
//! One JSON file holds the connection details and the default schema name.
//! When the file is missing it is written with defaults, so a first run
//! leaves a config the operator can edit. The store core never reads this;
//! the CLI loads it once and threads it into the HTTP layer explicitly.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default location of the config file, next to the process.
pub const DEFAULT_CONFIG_PATH: &str = "./veildb.json";

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Read(std::io::Error),

    #[error("failed to write default config: {0}")]
    Write(std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Connection details and default schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Schema used when a caller does not name one.
    #[serde(default = "default_schema")]
    pub schema_name: String,
}

fn default_username() -> String {
    "veil".to_string()
}
fn default_password() -> String {
    "veil".to_string()
}
fn default_host() -> String {
    "localhost".to_string()
}
fn default_port() -> u16 {
    4141
}
fn default_schema() -> String {
    "public".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            username: default_username(),
            password: default_password(),
            host: default_host(),
            port: default_port(),
            schema_name: default_schema(),
        }
    }
}

impl Config {
    /// Read the config file, or write defaults to it when absent.
    pub fn load_or_init(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            let config = Self::default();
            let pretty = serde_json::to_string_pretty(&config)?;
            fs::write(path, pretty).map_err(ConfigError::Write)?;
            return Ok(config);
        }

        let content = fs::read_to_string(path).map_err(ConfigError::Read)?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configs with missing connection details.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(ConfigError::Invalid(
                "username and password are required".to_string(),
            ));
        }
        if self.host.is_empty() {
            return Err(ConfigError::Invalid("host is required".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::Invalid("port is required".to_string()));
        }
        if self.schema_name.is_empty() {
            return Err(ConfigError::Invalid("schema_name is required".to_string()));
        }
        Ok(())
    }

    /// Bind address for the HTTP server.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
