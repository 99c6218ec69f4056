//! Polling schedule
//!
//! Decides *when* medal data may be fetched and drives periodic refreshes.
//!
//! # Modules
//!
//! - [`window`] - Operating hours in the event's time zone
//! - [`clock`] - Injectable time source
//! - [`task`] - Fixed-period refresh loop with graceful shutdown
//! - [`error`] - Scheduler error types
//!
//! # Example
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use medalwatch::scheduler::OperatingWindow;
//!
//! let window = OperatingWindow::default();
//! // 10:00 in Paris during the Games
//! let morning = Utc.with_ymd_and_hms(2026, 2, 10, 9, 0, 0).unwrap();
//! assert!(window.contains(morning));
//! ```

pub mod clock;
pub mod error;
pub mod task;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{SchedulerError, SchedulerResult};
pub use task::{PollingTask, Updatable};
pub use window::OperatingWindow;
