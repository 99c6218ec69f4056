//! Per-country polling coordinator
//!
//! A [`MedalCoordinator`] owns everything known about one tracked country:
//! the last good [`MedalRecord`], the one-shot force flag and the update
//! status. Each refresh cycle goes through the same gate:
//!
//! ```text
//!            in window or forced?
//!   Idle ──────────────────────────▶ Fetching ──▶ Updated
//!    ▲  no: serve snapshot, no I/O       │
//!    │                                   └──────▶ FetchFailed (snapshot kept)
//!    └───────────────────────────────────────────────┘
//! ```
//!
//! Cycles are serialized per coordinator. Readers never wait on a cycle:
//! [`MedalCoordinator::current_medals`] is a synchronous in-memory read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};

use crate::cache::SnapshotCache;
use crate::config::{Config, ConfigError};
use crate::countries::CountryRef;
use crate::crawler::PageSource;
use crate::metrics;
use crate::models::MedalRecord;
use crate::parser::{MedalTableParser, ParseOutcome};
use crate::scheduler::{Clock, OperatingWindow, SystemClock, Updatable};
use crate::utils::error::UpdateError;

/// Deadline for one fetch, body included
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// Options
// ============================================================================

/// Settings shared by every coordinator of a registry
#[derive(Debug, Clone)]
pub struct CoordinatorOptions {
    /// Hours during which timer-driven cycles may fetch
    pub window: OperatingWindow,

    /// Deadline for the fetch step of a cycle
    pub fetch_timeout: Duration,

    /// Time source for the window check and status timestamps
    pub clock: Arc<dyn Clock>,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            window: OperatingWindow::default(),
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            clock: Arc::new(SystemClock),
        }
    }
}

impl CoordinatorOptions {
    /// Build options from loaded configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Ok(Self {
            window: config.polling.window()?,
            fetch_timeout: config.source.request_timeout(),
            clock: Arc::new(SystemClock),
        })
    }

    #[must_use]
    pub fn with_window(mut self, window: OperatingWindow) -> Self {
        self.window = window;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}

// ============================================================================
// State Views
// ============================================================================

/// Point-in-time view of a coordinator's state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CoordinatorState {
    pub country_code: &'static str,
    pub last_record: Option<MedalRecord>,
    pub force_flag: bool,
}

/// Out-of-band update health
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpdateStatus {
    /// Whether the most recent fetch attempt succeeded
    pub last_update_success: bool,

    /// Message of the most recent failure, cleared on success
    pub last_error: Option<String>,

    pub last_attempt_at: Option<DateTime<Utc>>,

    pub last_success_at: Option<DateTime<Utc>>,

    /// Failed attempts since the last success
    pub consecutive_failures: u32,

    /// How the last fetched page was read (found, not_listed, table_missing)
    pub last_parse_outcome: Option<&'static str>,
}

/// What a cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Outside the operating window; the snapshot was served without I/O
    Idle(MedalRecord),

    /// The page was fetched and parsed
    Updated(ParseOutcome),

    /// A forced request was satisfied by a cycle that ran while it waited
    Coalesced(MedalRecord),
}

impl CycleOutcome {
    /// Record a reader sees after this cycle
    pub fn record(&self) -> MedalRecord {
        match self {
            Self::Idle(record) | Self::Coalesced(record) => record.clone(),
            Self::Updated(outcome) => outcome.clone().into_record(),
        }
    }

    /// Whether this cycle issued a fetch
    pub fn fetched(&self) -> bool {
        matches!(self, Self::Updated(_))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle(_) => "idle",
            Self::Updated(_) => "updated",
            Self::Coalesced(_) => "coalesced",
        }
    }
}

// ============================================================================
// Coordinator
// ============================================================================

/// Polling coordinator for one country
pub struct MedalCoordinator {
    country: &'static CountryRef,
    source: Arc<dyn PageSource>,
    parser: MedalTableParser,
    window: OperatingWindow,
    clock: Arc<dyn Clock>,
    fetch_timeout: Duration,

    /// One-shot window override for the next cycle
    force: AtomicBool,

    /// Held for the whole of a cycle
    cycle: Mutex<()>,

    snapshot: SnapshotCache<MedalRecord>,
    status: SnapshotCache<UpdateStatus>,
}

impl MedalCoordinator {
    /// Create a coordinator; the force flag starts set so the first cycle
    /// always fetches
    pub fn new(
        country: &'static CountryRef,
        source: Arc<dyn PageSource>,
        options: CoordinatorOptions,
    ) -> Self {
        Self {
            country,
            source,
            parser: MedalTableParser::new(),
            window: options.window,
            clock: options.clock,
            fetch_timeout: options.fetch_timeout,
            force: AtomicBool::new(true),
            cycle: Mutex::new(()),
            snapshot: SnapshotCache::new(),
            status: SnapshotCache::new(),
        }
    }

    pub fn country(&self) -> &'static CountryRef {
        self.country
    }

    pub fn code(&self) -> &'static str {
        self.country.code
    }

    /// Current record, or the zero record before any data exists
    pub fn current_medals(&self) -> MedalRecord {
        self.snapshot.get().unwrap_or_else(MedalRecord::zero)
    }

    /// Stored record, if any cycle has stored one
    pub fn snapshot(&self) -> Option<MedalRecord> {
        self.snapshot.get()
    }

    /// Subscribe to snapshot replacements
    pub fn subscribe(&self) -> watch::Receiver<Option<MedalRecord>> {
        self.snapshot.subscribe()
    }

    pub fn state(&self) -> CoordinatorState {
        CoordinatorState {
            country_code: self.code(),
            last_record: self.snapshot.get(),
            force_flag: self.is_force_pending(),
        }
    }

    pub fn update_status(&self) -> UpdateStatus {
        self.status.get().unwrap_or_default()
    }

    pub fn is_force_pending(&self) -> bool {
        self.force.load(Ordering::SeqCst)
    }

    /// Set the force flag; the next cycle fetches regardless of the window
    pub fn request_refresh(&self) {
        self.force.store(true, Ordering::SeqCst);
    }

    /// Force an immediate cycle
    ///
    /// Waits for a cycle already in flight. If that cycle fetched after the
    /// request was made, its result is returned instead of fetching again;
    /// a failed fetch surfaces as [`UpdateError::InFlightFailed`].
    pub async fn force_refresh(&self) -> Result<CycleOutcome, UpdateError> {
        self.request_refresh();
        let _guard = self.cycle.lock().await;

        if !self.is_force_pending() {
            tracing::debug!(country = %self.code(), "Forced refresh coalesced with cycle in flight");
            metrics::record_cycle(self.code(), "coalesced");

            let status = self.update_status();
            if !status.last_update_success {
                let reason = status
                    .last_error
                    .unwrap_or_else(|| "unknown error".to_string());
                return Err(UpdateError::InFlightFailed(reason));
            }
            return Ok(CycleOutcome::Coalesced(self.current_medals()));
        }

        self.run_locked().await
    }

    /// Run one cycle with the force flag as it stands
    pub async fn run_cycle(&self) -> Result<CycleOutcome, UpdateError> {
        let _guard = self.cycle.lock().await;
        self.run_locked().await
    }

    /// Body of a cycle; the caller holds `self.cycle`
    async fn run_locked(&self) -> Result<CycleOutcome, UpdateError> {
        let code = self.code();
        let now = self.clock.now();
        let forced = self.is_force_pending();

        if !forced && !self.window.contains(now) {
            tracing::debug!(
                country = %code,
                local_hour = self.window.local_hour(now),
                "Outside operating hours, using cached data"
            );
            metrics::record_cycle(code, "idle");
            return Ok(CycleOutcome::Idle(self.current_medals()));
        }

        tracing::debug!(country = %code, forced, "Fetching medal data");

        let fetched = {
            let _timer = metrics::start_fetch_timer(code);
            tokio::time::timeout(self.fetch_timeout, self.source.fetch_page()).await
        };

        // Cleared after every attempt, successful or not
        self.force.store(false, Ordering::SeqCst);

        let page = match fetched {
            Ok(Ok(page)) => page,
            Ok(Err(e)) => return Err(self.record_failure(UpdateError::Fetch(e), now)),
            Err(_) => return Err(self.record_failure(UpdateError::Timeout(self.fetch_timeout), now)),
        };

        let outcome = self.parser.parse_page(&page, code);
        let record = outcome.clone().into_record();

        self.snapshot.store(record.clone());
        self.record_success(outcome.as_str(), now);

        metrics::record_parse_outcome(code, outcome.as_str());
        metrics::record_cycle(code, "updated");
        metrics::set_medal_gauges(code, &record);

        tracing::info!(country = %code, record = %record, outcome = outcome.as_str(), "Medal data updated");
        Ok(CycleOutcome::Updated(outcome))
    }

    fn record_success(&self, parse_outcome: &'static str, now: DateTime<Utc>) {
        let mut status = self.update_status();
        status.last_update_success = true;
        status.last_error = None;
        status.last_attempt_at = Some(now);
        status.last_success_at = Some(now);
        status.consecutive_failures = 0;
        status.last_parse_outcome = Some(parse_outcome);
        self.status.store(status);

        metrics::set_consecutive_failures(self.code(), 0);
    }

    fn record_failure(&self, error: UpdateError, now: DateTime<Utc>) -> UpdateError {
        let code = self.code();

        let mut status = self.update_status();
        status.last_update_success = false;
        status.last_error = Some(error.to_string());
        status.last_attempt_at = Some(now);
        status.consecutive_failures = status.consecutive_failures.saturating_add(1);
        let failures = status.consecutive_failures;
        self.status.store(status);

        // Readers get the zero record until a first success
        if self.snapshot.store_if_empty(MedalRecord::zero()) {
            metrics::set_medal_gauges(code, &MedalRecord::zero());
        }

        metrics::record_cycle(code, "failed");
        metrics::set_consecutive_failures(code, failures);

        tracing::warn!(
            country = %code,
            error = %error,
            consecutive_failures = failures,
            recoverable = error.is_recoverable(),
            "Medal update failed, keeping cached data"
        );

        error
    }
}

impl fmt::Debug for MedalCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MedalCoordinator")
            .field("country", &self.country)
            .field("window", &self.window)
            .field("fetch_timeout", &self.fetch_timeout)
            .field("force", &self.is_force_pending())
            .field("snapshot", &self.snapshot.get())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Updatable for MedalCoordinator {
    type Output = MedalRecord;
    type Error = UpdateError;

    fn name(&self) -> String {
        format!("medals-{}", self.code())
    }

    async fn refresh(&self) -> Result<MedalRecord, UpdateError> {
        self.run_cycle().await.map(|outcome| outcome.record())
    }
}
