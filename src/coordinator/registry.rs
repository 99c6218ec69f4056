//! Tracker registry
//!
//! Owns one [`MedalCoordinator`] and its polling task per tracked entry.
//! A country can be tracked by at most one entry at a time.

use futures::future::join_all;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use super::tracker::{CoordinatorOptions, MedalCoordinator};
use crate::countries::{self, CountryRef};
use crate::crawler::PageSource;
use crate::metrics;
use crate::scheduler::PollingTask;
use crate::utils::error::RegistryError;

/// Default period between scheduled refreshes
pub const DEFAULT_UPDATE_INTERVAL: Duration = Duration::from_secs(300);

/// A coordinator and the task driving it
struct TrackedEntry {
    coordinator: Arc<MedalCoordinator>,
    task: PollingTask,
}

/// Public description of a tracked entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackedCountry {
    pub entry_id: String,
    pub country: CountryRef,
}

/// Registry of tracked countries
pub struct TrackerRegistry {
    /// Page source shared by every coordinator
    source: Arc<dyn PageSource>,

    options: CoordinatorOptions,

    update_interval: Duration,

    /// Tracked entries keyed by entry id
    entries: RwLock<HashMap<String, TrackedEntry>>,
}

impl TrackerRegistry {
    /// Create an empty registry
    pub fn new(
        source: Arc<dyn PageSource>,
        options: CoordinatorOptions,
        update_interval: Duration,
    ) -> Self {
        Self {
            source,
            options,
            update_interval,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn update_interval(&self) -> Duration {
        self.update_interval
    }

    /// Start tracking a country
    ///
    /// Runs the first cycle before returning; the force flag is set on a
    /// new coordinator, so that cycle fetches at any hour. A failed first
    /// cycle is logged and leaves the zero record in place. The polling
    /// task then ticks once per interval.
    ///
    /// # Errors
    ///
    /// - `RegistryError::UnknownCountry` if the code is not in the registry
    /// - `RegistryError::DuplicateEntry` if the entry id is taken
    /// - `RegistryError::AlreadyTracked` if another entry tracks the country
    pub async fn track(
        &self,
        entry_id: impl Into<String>,
        code: &str,
    ) -> Result<Arc<MedalCoordinator>, RegistryError> {
        let entry_id = entry_id.into();
        let code = code.trim().to_ascii_uppercase();
        let country =
            countries::lookup(&code).ok_or_else(|| RegistryError::UnknownCountry(code.clone()))?;

        check_conflicts(&*self.entries.read().await, &entry_id, country.code)?;

        let coordinator = Arc::new(MedalCoordinator::new(
            country,
            self.source.clone(),
            self.options.clone(),
        ));

        if let Err(e) = coordinator.run_cycle().await {
            tracing::warn!(country = %country.code, error = %e, "Initial medal fetch failed");
        }

        let mut entries = self.entries.write().await;
        // Another track() may have won the race during the first cycle
        check_conflicts(&entries, &entry_id, country.code)?;

        let task = PollingTask::spawn(coordinator.clone(), self.update_interval)?;
        entries.insert(
            entry_id.clone(),
            TrackedEntry {
                coordinator: coordinator.clone(),
                task,
            },
        );
        metrics::set_tracked_countries(entries.len());

        tracing::info!(entry = %entry_id, country = %country, "Tracking country");
        Ok(coordinator)
    }

    /// Stop tracking an entry
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::EntryNotFound` for an unknown entry id
    pub async fn untrack(&self, entry_id: &str) -> Result<Arc<MedalCoordinator>, RegistryError> {
        let entry = {
            let mut entries = self.entries.write().await;
            let entry = entries
                .remove(entry_id)
                .ok_or_else(|| RegistryError::EntryNotFound(entry_id.to_string()))?;
            metrics::set_tracked_countries(entries.len());
            entry
        };

        entry.task.shutdown().await;
        metrics::forget_country(entry.coordinator.code());

        tracing::info!(entry = %entry_id, country = %entry.coordinator.country(), "Stopped tracking country");
        Ok(entry.coordinator)
    }

    /// Coordinator of an entry
    pub async fn get(&self, entry_id: &str) -> Option<Arc<MedalCoordinator>> {
        self.entries
            .read()
            .await
            .get(entry_id)
            .map(|e| e.coordinator.clone())
    }

    /// Coordinator tracking a country code
    pub async fn find_country(&self, code: &str) -> Option<Arc<MedalCoordinator>> {
        self.entries
            .read()
            .await
            .values()
            .find(|e| e.coordinator.code().eq_ignore_ascii_case(code))
            .map(|e| e.coordinator.clone())
    }

    /// All coordinators with their entry ids, ordered by country code
    pub async fn coordinators(&self) -> Vec<(String, Arc<MedalCoordinator>)> {
        let mut all: Vec<_> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(id, e)| (id.clone(), e.coordinator.clone()))
            .collect();
        all.sort_by_key(|(_, c)| c.code());
        all
    }

    /// Tracked entries, ordered by country code
    pub async fn entries(&self) -> Vec<TrackedCountry> {
        self.coordinators()
            .await
            .into_iter()
            .map(|(entry_id, c)| TrackedCountry {
                entry_id,
                country: *c.country(),
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Stop every polling task and clear the registry
    pub async fn shutdown(&self) {
        let drained: Vec<TrackedEntry> = {
            let mut entries = self.entries.write().await;
            entries.drain().map(|(_, e)| e).collect()
        };

        let count = drained.len();
        join_all(drained.into_iter().map(|e| e.task.shutdown())).await;
        metrics::set_tracked_countries(0);

        tracing::info!(stopped = count, "Tracker registry shut down");
    }
}

impl std::fmt::Debug for TrackerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerRegistry")
            .field("options", &self.options)
            .field("update_interval", &self.update_interval)
            .finish_non_exhaustive()
    }
}

fn check_conflicts(
    entries: &HashMap<String, TrackedEntry>,
    entry_id: &str,
    code: &str,
) -> Result<(), RegistryError> {
    if entries.contains_key(entry_id) {
        return Err(RegistryError::DuplicateEntry(entry_id.to_string()));
    }

    if let Some((existing, _)) = entries
        .iter()
        .find(|(_, e)| e.coordinator.code() == code)
    {
        return Err(RegistryError::AlreadyTracked {
            code: code.to_string(),
            entry_id: existing.clone(),
        });
    }

    Ok(())
}
