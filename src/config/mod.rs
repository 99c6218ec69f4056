//! Configuration management for medalwatch
//!
//! This module handles loading and validating configuration from environment
//! variables and TOML files. Command-line flags override individual values
//! after loading.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::crawler::DEFAULT_USER_AGENT;
use crate::scheduler::window::{
    OperatingWindow, DEFAULT_END_HOUR, DEFAULT_START_HOUR, DEFAULT_TIMEZONE,
};

/// Default medal table page
pub const DEFAULT_SOURCE_URL: &str =
    "https://en.wikipedia.org/wiki/2026_Winter_Olympics_medal_table";

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for this schema
    #[error("Failed to parse TOML config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A value failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Medal page source
    pub source: SourceConfig,

    /// Polling schedule
    pub polling: PollingConfig,

    /// HTTP API server
    pub server: ServerConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Medal page source configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Medal table page URL
    pub url: String,

    /// User agent string
    pub user_agent: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Polling schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Seconds between scheduled refreshes
    pub update_interval_secs: u64,

    /// First hour of the operating window
    pub start_hour: u32,

    /// Last hour of the operating window (inclusive)
    pub end_hour: u32,

    /// Event time zone (tz database name)
    pub timezone: String,
}

/// HTTP API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_address: String,

    /// Enable CORS
    pub enable_cors: bool,

    /// Enable request logging
    pub enable_request_logging: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SOURCE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            update_interval_secs: 300,
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

impl PollingConfig {
    /// Get update interval as Duration
    #[must_use]
    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_interval_secs)
    }

    /// Resolve the configured time zone
    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::Invalid(format!("unknown timezone: {}", self.timezone)))
    }

    /// Build the operating window
    pub fn window(&self) -> Result<OperatingWindow, ConfigError> {
        OperatingWindow::from_names(self.start_hour, self.end_hour, &self.timezone)
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8123".to_string(),
            enable_cors: true,
            enable_request_logging: true,
        }
    }
}

impl ServerConfig {
    /// Parse the bind address
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.bind_address
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("bind_address {}: {e}", self.bind_address)))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from `MEDALWATCH_*` environment variables
    ///
    /// Unset or unparseable variables fall back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let config = Self {
            source: SourceConfig {
                url: env_or("MEDALWATCH_SOURCE_URL", defaults.source.url),
                user_agent: env_or("MEDALWATCH_USER_AGENT", defaults.source.user_agent),
                request_timeout_secs: env_or(
                    "MEDALWATCH_REQUEST_TIMEOUT",
                    defaults.source.request_timeout_secs,
                ),
            },
            polling: PollingConfig {
                update_interval_secs: env_or(
                    "MEDALWATCH_UPDATE_INTERVAL",
                    defaults.polling.update_interval_secs,
                ),
                start_hour: env_or("MEDALWATCH_START_HOUR", defaults.polling.start_hour),
                end_hour: env_or("MEDALWATCH_END_HOUR", defaults.polling.end_hour),
                timezone: env_or("MEDALWATCH_TIMEZONE", defaults.polling.timezone),
            },
            server: ServerConfig {
                bind_address: env_or("MEDALWATCH_BIND_ADDRESS", defaults.server.bind_address),
                enable_cors: env_or("MEDALWATCH_ENABLE_CORS", defaults.server.enable_cors),
                enable_request_logging: env_or(
                    "MEDALWATCH_REQUEST_LOGGING",
                    defaults.server.enable_request_logging,
                ),
            },
            logging: LoggingConfig {
                level: env_or("MEDALWATCH_LOG_LEVEL", defaults.logging.level),
                format: env_or("MEDALWATCH_LOG_FORMAT", defaults.logging.format),
            },
        };

        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// Missing sections and keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.source.url)
            .map_err(|e| ConfigError::Invalid(format!("source url {}: {e}", self.source.url)))?;

        if self.source.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.polling.update_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "update_interval_secs must be greater than 0".to_string(),
            ));
        }

        self.polling.window()?;
        self.server.socket_addr()?;

        if !matches!(self.logging.format.as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "log format must be 'text' or 'json', got '{}'",
                self.logging.format
            )));
        }

        Ok(())
    }
}
