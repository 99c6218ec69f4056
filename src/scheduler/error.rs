//! Error types for the scheduler module

use std::fmt;

/// Result type for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;

/// Scheduler-specific errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    /// Hour outside 0-24
    InvalidHour {
        hour: u32,
    },

    /// Window ends before it starts
    InvalidWindow {
        start_hour: u32,
        end_hour: u32,
    },

    /// Timezone name not in the tz database
    InvalidTimezone {
        tz: String,
    },

    /// Zero-length polling interval
    InvalidInterval,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHour { hour } => {
                write!(f, "Invalid hour '{}'. Must be 0-24", hour)
            }
            Self::InvalidWindow {
                start_hour,
                end_hour,
            } => {
                write!(
                    f,
                    "Invalid operating window {}-{}: end hour precedes start hour",
                    start_hour, end_hour
                )
            }
            Self::InvalidTimezone { tz } => {
                write!(f, "Invalid timezone: {}", tz)
            }
            Self::InvalidInterval => {
                write!(f, "Polling interval must be greater than zero")
            }
        }
    }
}

impl std::error::Error for SchedulerError {}

impl SchedulerError {
    /// Create an invalid hour error
    pub fn invalid_hour(hour: u32) -> Self {
        Self::InvalidHour { hour }
    }

    /// Create an invalid timezone error
    pub fn invalid_timezone(tz: impl Into<String>) -> Self {
        Self::InvalidTimezone { tz: tz.into() }
    }

    /// Scheduler errors are configuration mistakes; retrying will not help
    pub fn is_recoverable(&self) -> bool {
        false
    }
}
