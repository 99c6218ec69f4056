use anyhow::Result;
use futures::future::join_all;

use medalwatch::config::Config;

use super::{build_registry, shutdown_signal, track_all};

/// Track countries and log every snapshot change until Ctrl+C
pub async fn watch(config: Config, codes: Vec<String>) -> Result<()> {
    let registry = build_registry(&config)?;
    track_all(&registry, &codes).await?;

    println!(
        "Watching {} countries (every {}s). Press Ctrl+C to stop.\n",
        codes.len(),
        config.polling.update_interval_secs
    );

    let watchers = registry.coordinators().await.into_iter().map(|(_, coordinator)| {
        let mut rx = coordinator.subscribe();
        async move {
            loop {
                let current = rx.borrow_and_update().clone();
                if let Some(record) = current {
                    println!("{:<30} {}", coordinator.country().to_string(), record);
                }
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = join_all(watchers) => {}
        _ = shutdown_signal() => {}
    }

    registry.shutdown().await;
    println!("Watch stopped.");
    Ok(())
}
