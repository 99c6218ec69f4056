//! Error types for medalwatch
//!
//! This module defines custom error types used throughout the application.

use std::time::Duration;
use thiserror::Error;

use crate::scheduler::error::SchedulerError;

/// Errors that can occur during HTTP fetching operations
///
/// Every variant is a transport-level failure; parse problems never show
/// up here.
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error (DNS, connection, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx status code
    #[error("Server returned status {0}")]
    Status(u16),

    /// Request timeout
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl FetchError {
    /// Map a reqwest error, keeping timeouts distinct
    pub fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            Self::Timeout(timeout)
        } else {
            Self::Http(err)
        }
    }

    /// Whether the next scheduled cycle may succeed
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Timeout(_) => true,
            Self::Status(code) => matches!(code, 429 | 500..=599),
            Self::InvalidUrl(_) => false,
        }
    }
}

/// The "update failed" signal raised by a coordinator cycle
#[derive(Error, Debug)]
pub enum UpdateError {
    /// Fetch failed
    #[error("Error fetching medal data: {0}")]
    Fetch(#[from] FetchError),

    /// The whole cycle exceeded its deadline
    #[error("Medal update timed out after {0:?}")]
    Timeout(Duration),

    /// A forced refresh joined a cycle already in flight, and that cycle failed
    #[error("Concurrent medal update failed: {0}")]
    InFlightFailed(String),
}

impl UpdateError {
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Timeout(_) | Self::InFlightFailed(_) => true,
        }
    }
}

/// Errors from the tracker registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Code not present in the static country registry
    #[error("Unknown country code: {0}")]
    UnknownCountry(String),

    /// The country already has a tracker
    #[error("Country {code} is already tracked by entry {entry_id}")]
    AlreadyTracked { code: String, entry_id: String },

    /// Entry id already in use
    #[error("Entry already exists: {0}")]
    DuplicateEntry(String),

    /// No tracker with that entry id
    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    /// The polling task could not be started
    #[error("Failed to start polling: {0}")]
    Scheduler(#[from] SchedulerError),
}
