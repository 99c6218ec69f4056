//! Refresh dispatch
//!
//! Control-plane entry point that forces an immediate refresh of one
//! tracked country or of all of them.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use super::registry::TrackerRegistry;
use crate::models::MedalRecord;

/// Wildcard accepted in place of a country code
pub const ALL_COUNTRIES: &str = "all";

/// Which coordinators a forced refresh applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshTarget {
    All,
    Country(String),
}

impl RefreshTarget {
    /// Interpret a control argument: `"all"` (any case) or a country code
    pub fn from_arg(arg: &str) -> Self {
        let arg = arg.trim();
        if arg.eq_ignore_ascii_case(ALL_COUNTRIES) {
            Self::All
        } else {
            Self::Country(arg.to_ascii_uppercase())
        }
    }

    /// Whether a coordinator for `code` is targeted
    pub fn matches(&self, code: &str) -> bool {
        match self {
            Self::All => true,
            Self::Country(target) => target.eq_ignore_ascii_case(code),
        }
    }
}

impl FromStr for RefreshTarget {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_arg(s))
    }
}

impl fmt::Display for RefreshTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_COUNTRIES),
            Self::Country(code) => f.write_str(code),
        }
    }
}

/// Request body of the refresh endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    /// Country code or `"all"`
    pub country: String,
}

/// Result of refreshing one coordinator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub entry_id: String,
    pub country_code: &'static str,
    pub success: bool,
    /// Cycle outcome (`updated`, `coalesced`, `failed`)
    pub outcome: &'static str,
    /// Record readers see after the refresh
    pub record: MedalRecord,
    pub error: Option<String>,
}

/// Forces refreshes on registry coordinators
#[derive(Debug, Clone)]
pub struct RefreshDispatcher {
    registry: Arc<TrackerRegistry>,
}

impl RefreshDispatcher {
    pub fn new(registry: Arc<TrackerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<TrackerRegistry> {
        &self.registry
    }

    /// Force a refresh of every targeted coordinator
    ///
    /// Coordinators refresh concurrently; each one still serializes with
    /// its own scheduled cycle. An empty result means nothing matched.
    pub async fn force_refresh(&self, target: &RefreshTarget) -> Vec<RefreshReport> {
        let targets: Vec<_> = self
            .registry
            .coordinators()
            .await
            .into_iter()
            .filter(|(_, c)| target.matches(c.code()))
            .collect();

        if targets.is_empty() {
            tracing::warn!(target = %target, "Forced refresh matched no tracked country");
            return Vec::new();
        }

        tracing::info!(target = %target, coordinators = targets.len(), "Forcing refresh");

        join_all(targets.into_iter().map(|(entry_id, coordinator)| async move {
            let result = coordinator.force_refresh().await;
            let record = coordinator.current_medals();

            match result {
                Ok(outcome) => RefreshReport {
                    entry_id,
                    country_code: coordinator.code(),
                    success: true,
                    outcome: outcome.as_str(),
                    record,
                    error: None,
                },
                Err(e) => RefreshReport {
                    entry_id,
                    country_code: coordinator.code(),
                    success: false,
                    outcome: "failed",
                    record,
                    error: Some(e.to_string()),
                },
            }
        }))
        .await
    }
}
