pub mod countries;
pub mod once;
pub mod serve;
pub mod watch;

// Re-export command functions for convenience
pub use countries::countries;
pub use once::once;
pub use serve::serve;
pub use watch::watch;

use anyhow::{Context, Result};
use std::sync::Arc;

use medalwatch::config::Config;
use medalwatch::coordinator::{CoordinatorOptions, TrackerRegistry};
use medalwatch::crawler::MedalFetcher;

/// Build a registry backed by the live medal page
pub(crate) fn build_registry(config: &Config) -> Result<Arc<TrackerRegistry>> {
    let fetcher = MedalFetcher::from_config(&config.source).context("Failed to create fetcher")?;
    let options =
        CoordinatorOptions::from_config(config).context("Invalid polling configuration")?;

    Ok(Arc::new(TrackerRegistry::new(
        Arc::new(fetcher),
        options,
        config.polling.update_interval(),
    )))
}

/// Track every code, using the code as entry id
pub(crate) async fn track_all(registry: &TrackerRegistry, codes: &[String]) -> Result<()> {
    for code in codes {
        registry
            .track(code.to_ascii_lowercase(), code)
            .await
            .with_context(|| format!("Failed to track {code}"))?;
    }
    Ok(())
}

/// Resolve once Ctrl+C is received
pub(crate) async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Shutdown signal received");
        }
        Err(e) => {
            tracing::error!("Failed to wait for Ctrl+C: {}", e);
        }
    }
}
