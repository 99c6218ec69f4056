//! Unified error handling for the medalwatch crate
//!
//! Domain modules keep their own error enums; this module wraps them in a
//! single [`Error`] for code that crosses module boundaries (commands, the
//! binary).
//!
//! # Architecture
//!
//! - [`WatchErrorTrait`] - Common interface implemented by the unified error
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use medalwatch::error::{Error, WatchErrorTrait};
//!
//! fn report(err: &Error) {
//!     if err.is_recoverable() {
//!         tracing::warn!(category = %err.category(), "{}", err);
//!     } else {
//!         tracing::error!(category = %err.category(), "{}", err);
//!     }
//! }
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::api::ServerError;
pub use crate::config::ConfigError;
pub use crate::parser::ParseAnomaly;
pub use crate::scheduler::error::SchedulerError;
pub use crate::utils::error::{FetchError, RegistryError, UpdateError};

/// Common trait for medalwatch error types
pub trait WatchErrorTrait: std::error::Error {
    /// Check if this error is recoverable (a later attempt may succeed)
    fn is_recoverable(&self) -> bool;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, status, timeout)
    Network,
    /// Parsing and data extraction errors
    Parsing,
    /// Configuration and validation errors
    Config,
    /// Scheduler and timing errors
    Scheduler,
    /// Tracker registry errors
    Registry,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::Parsing => "parsing",
            Self::Config => "config",
            Self::Scheduler => "scheduler",
            Self::Registry => "registry",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unified error type for the medalwatch crate
#[derive(Error, Debug)]
pub enum Error {
    /// Fetch-specific errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// A refresh cycle failed
    #[error("Update error: {0}")]
    Update(#[from] UpdateError),

    /// A matched row could not be read
    #[error("Parse error: {0}")]
    Parse(#[from] ParseAnomaly),

    /// Tracker registry errors
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Scheduler and timing errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// API server errors
    #[error("Server error: {0}")]
    Server(#[from] ServerError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{context}")]
    Other {
        context: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl WatchErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Update(e) => e.is_recoverable(),
            // The next page revision may fix the row
            Self::Parse(_) => true,
            Self::Registry(_) => false,
            Self::Scheduler(e) => e.is_recoverable(),
            Self::Config(_) => false,
            Self::Server(ServerError::ServeError(_)) => true,
            Self::Server(_) => false,
            Self::Io(_) => true,
            Self::Json(_) => false,
            Self::Other { .. } => false,
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(_) | Self::Update(_) | Self::Server(_) | Self::Io(_) => {
                ErrorCategory::Network
            }
            Self::Parse(_) | Self::Json(_) => ErrorCategory::Parsing,
            Self::Registry(_) => ErrorCategory::Registry,
            Self::Scheduler(_) => ErrorCategory::Scheduler,
            Self::Config(_) => ErrorCategory::Config,
            Self::Other { .. } => ErrorCategory::Other,
        }
    }
}

impl Error {
    /// Create a generic error with context
    pub fn other(context: impl Into<String>) -> Self {
        Self::Other {
            context: context.into(),
            source: None,
        }
    }

    /// Create a generic error with context and source
    pub fn with_source(
        context: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Other {
            context: context.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;
