mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medalwatch::config::Config;

#[derive(Parser)]
#[command(
    name = "medalwatch",
    version,
    about = "Winter Olympics medal table tracker with cached snapshots and a control API",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file (defaults to MEDALWATCH_* environment variables)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// List trackable countries
    Countries {
        /// Print as JSON
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Fetch one country's medals now and print them as JSON
    Once {
        /// Country code (e.g. NOR)
        #[arg(short, long)]
        country: String,

        /// Print sensor readings instead of the raw record
        #[arg(long, default_value = "false")]
        sensors: bool,
    },

    /// Track countries and log every change
    Watch {
        /// Country codes to track
        #[arg(short, long = "country", required = true, num_args = 1..)]
        countries: Vec<String>,
    },

    /// Track countries and serve the HTTP API
    Serve {
        /// Country codes to track
        #[arg(short, long = "country", required = true, num_args = 1..)]
        countries: Vec<String>,

        /// Bind address (overrides configuration)
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(format) = &cli.log_format {
        config.logging.format = format.clone();
    }
    if let Commands::Serve {
        bind: Some(bind), ..
    } = &cli.command
    {
        config.server.bind_address = bind.clone();
    }
    config.validate().context("Invalid configuration")?;

    // Initialize tracing/logging
    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    if let Err(e) = medalwatch::metrics::init_metrics() {
        tracing::warn!("Metrics initialization failed: {}", e);
    }

    tracing::info!("medalwatch starting");

    match cli.command {
        Commands::Countries { json } => {
            commands::countries(json)?;
        }

        Commands::Once { country, sensors } => {
            tracing::info!(country = %country, sensors = %sensors, "Starting once command");
            commands::once(config, country, sensors).await?;
        }

        Commands::Watch { countries } => {
            tracing::info!(countries = ?countries, "Starting watch command");
            commands::watch(config, countries).await?;
        }

        Commands::Serve { countries, .. } => {
            tracing::info!(countries = ?countries, "Starting serve command");
            commands::serve(config, countries).await?;
        }
    }

    tracing::info!("medalwatch completed successfully");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("medalwatch=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(format!("medalwatch={level},warn")))
    };

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .try_init()?;
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .try_init()?;
        }
    }

    Ok(())
}
