//! Medal polling coordination
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               TrackerRegistry                │
//! │                                              │
//! │  entry ──▶ MedalCoordinator ◀── PollingTask  │
//! │              │  window gate                  │
//! │              │  force flag                   │
//! │              │  snapshot cache               │
//! │              ▼                               │
//! │          PageSource ──▶ MedalTableParser     │
//! └──────────────────────────────────────────────┘
//!          ▲
//!          │ force_refresh(code | all)
//!   RefreshDispatcher
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use medalwatch::coordinator::{CoordinatorOptions, RefreshDispatcher, RefreshTarget, TrackerRegistry};
//!
//! let registry = Arc::new(TrackerRegistry::new(source, CoordinatorOptions::default(), interval));
//! registry.track("nor", "NOR").await?;
//!
//! let dispatcher = RefreshDispatcher::new(registry.clone());
//! dispatcher.force_refresh(&RefreshTarget::All).await;
//! ```

pub mod dispatch;
pub mod registry;
pub mod tracker;

// Re-export main types
pub use dispatch::{RefreshDispatcher, RefreshReport, RefreshRequest, RefreshTarget};
pub use registry::{TrackedCountry, TrackerRegistry, DEFAULT_UPDATE_INTERVAL};
pub use tracker::{
    CoordinatorOptions, CoordinatorState, CycleOutcome, MedalCoordinator, UpdateStatus,
    DEFAULT_FETCH_TIMEOUT,
};
