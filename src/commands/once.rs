use anyhow::{bail, Context, Result};
use std::sync::Arc;

use medalwatch::config::Config;
use medalwatch::coordinator::{CoordinatorOptions, MedalCoordinator};
use medalwatch::countries;
use medalwatch::crawler::MedalFetcher;
use medalwatch::sensor::MedalSensor;

/// Run one forced cycle for a country and print the result as JSON
pub async fn once(config: Config, code: String, sensors: bool) -> Result<()> {
    let country = countries::lookup(&code.to_ascii_uppercase())
        .with_context(|| format!("Unknown country code: {code}"))?;

    let fetcher = MedalFetcher::from_config(&config.source).context("Failed to create fetcher")?;
    let options =
        CoordinatorOptions::from_config(&config).context("Invalid polling configuration")?;
    let coordinator = MedalCoordinator::new(country, Arc::new(fetcher), options);

    let outcome = coordinator.force_refresh().await;

    let output = if sensors {
        let readings: Vec<_> = MedalSensor::for_country(country)
            .iter()
            .map(|s| s.read(&coordinator))
            .collect();
        serde_json::to_string_pretty(&readings)?
    } else {
        serde_json::to_string_pretty(&coordinator.current_medals())?
    };
    println!("{output}");

    if let Err(e) = outcome {
        bail!("Update failed for {country}: {e}");
    }

    Ok(())
}
