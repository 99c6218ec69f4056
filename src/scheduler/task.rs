//! Periodic refresh task
//!
//! Drives anything [`Updatable`] on a fixed period until shut down. The
//! first tick fires one full period after spawning; callers that need an
//! initial refresh run it themselves before spawning.

use async_trait::async_trait;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use super::error::{SchedulerError, SchedulerResult};

/// Something that can refresh itself on demand
#[async_trait]
pub trait Updatable: Send + Sync {
    type Output: Send;
    type Error: Display + Send;

    /// Name used in task logs
    fn name(&self) -> String;

    /// Run one refresh cycle
    async fn refresh(&self) -> Result<Self::Output, Self::Error>;
}

/// Handle to a running polling task
pub struct PollingTask {
    name: String,
    handle: Option<JoinHandle<()>>,
    shutdown: watch::Sender<bool>,
}

impl PollingTask {
    /// Spawn a task that calls `target.refresh()` every `period`
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidInterval` for a zero period
    pub fn spawn<U>(target: Arc<U>, period: Duration) -> SchedulerResult<Self>
    where
        U: Updatable + 'static,
    {
        if period.is_zero() {
            return Err(SchedulerError::InvalidInterval);
        }

        let name = target.name();
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        match target.refresh().await {
                            Ok(_) => tracing::debug!(task = %task_name, "Scheduled refresh complete"),
                            Err(e) => tracing::warn!(task = %task_name, error = %e, "Scheduled refresh failed"),
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        tracing::info!(task = %task_name, "Polling task shutting down");
                        break;
                    }
                }
            }
        });

        tracing::debug!(task = %name, period_secs = period.as_secs(), "Polling task started");

        Ok(Self {
            name,
            handle: Some(handle),
            shutdown,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the task is still running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Trigger shutdown and wait for the loop to exit
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                tracing::warn!(task = %self.name, error = %e, "Polling task ended abnormally");
            }
        }
    }
}

impl Drop for PollingTask {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
    }
}

impl std::fmt::Debug for PollingTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingTask")
            .field("name", &self.name)
            .field("running", &self.is_running())
            .finish()
    }
}
