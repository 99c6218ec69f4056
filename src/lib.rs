//! medalwatch - Winter Olympics medal table tracker
//!
//! Polls a public medal table page, extracts one country's rank and medal
//! counts, and keeps an always-available cached snapshot per tracked
//! country.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`countries`] - Static country registry, aliases and matching
//! - [`crawler`] - Page retrieval over HTTP
//! - [`parser`] - Medal table location and row extraction
//! - [`models`] - Core data structures and types
//! - [`cache`] - In-memory snapshot cache
//! - [`scheduler`] - Operating window and periodic refresh tasks
//! - [`coordinator`] - Per-country coordinators, registry and refresh dispatch
//! - [`sensor`] - Sensor adapters over medal records
//! - [`api`] - HTTP read and control API
//! - [`metrics`] - Prometheus metrics
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use medalwatch::config::Config;
//! use medalwatch::coordinator::{CoordinatorOptions, TrackerRegistry};
//! use medalwatch::crawler::MedalFetcher;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let fetcher = MedalFetcher::from_config(&config.source)?;
//!     let registry = TrackerRegistry::new(
//!         Arc::new(fetcher),
//!         CoordinatorOptions::from_config(&config)?,
//!         config.polling.update_interval(),
//!     );
//!
//!     let norway = registry.track("nor", "NOR").await?;
//!     println!("{}", norway.current_medals());
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cache;
pub mod config;
pub mod coordinator;
pub mod countries;
pub mod crawler;
pub mod error;
pub mod metrics;
pub mod models;
pub mod parser;
pub mod scheduler;
pub mod sensor;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::coordinator::{
        MedalCoordinator, RefreshDispatcher, RefreshTarget, TrackerRegistry,
    };
    pub use crate::countries::CountryRef;
    pub use crate::crawler::{MedalFetcher, PageSource};
    pub use crate::error::{Error, ErrorCategory, Result, WatchErrorTrait};
    pub use crate::models::{MedalKind, MedalRecord};
    pub use crate::parser::{MedalTableParser, ParseOutcome};
}

// Direct re-exports for convenience
pub use models::{MedalKind, MedalRecord};
