use anyhow::{Context, Result};

use medalwatch::api::ApiServer;
use medalwatch::config::Config;

use super::{build_registry, shutdown_signal, track_all};

/// Track countries and serve the API until Ctrl+C
pub async fn serve(config: Config, codes: Vec<String>) -> Result<()> {
    println!("Starting Medal API Server");
    println!("=========================");
    println!("  Bind Address: {}", config.server.bind_address);
    println!("  Update Interval: {}s", config.polling.update_interval_secs);
    println!(
        "  Operating Window: {:02}:00-{:02}:00 {}",
        config.polling.start_hour, config.polling.end_hour, config.polling.timezone
    );
    println!(
        "  CORS: {}",
        if config.server.enable_cors { "enabled" } else { "disabled" }
    );
    println!();

    let registry = build_registry(&config)?;
    track_all(&registry, &codes).await?;

    let server =
        ApiServer::new(&config.server, registry.clone()).context("Failed to create API server")?;

    println!("API Endpoints:");
    println!("  GET  /api/health                - Health check");
    println!("  GET  /api/countries             - Trackable countries");
    println!("  GET  /api/medals                - All tracked medal counts");
    println!("  GET  /api/medals/{{code}}         - One country's medal count");
    println!("  GET  /api/medals/{{code}}/sensors - Sensor readings");
    println!("  GET  /api/medals/{{code}}/status  - Update status");
    println!("  POST /api/refresh               - Force refresh (country or \"all\")");
    println!("  GET  /metrics                   - Prometheus metrics endpoint");
    println!();
    println!("Listening on http://{}", server.bind_address());
    println!("Press Ctrl+C to stop.\n");

    server.start_with_shutdown(shutdown_signal()).await?;

    registry.shutdown().await;
    println!("Medal API server stopped.");
    Ok(())
}
