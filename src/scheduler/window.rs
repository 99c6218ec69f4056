//! Operating window
//!
//! Live polling is only permitted while the local hour in the event's time
//! zone lies in `[start_hour, end_hour]`, bounds inclusive. With the
//! default `8..=24` the window opens at 08:00 and stays open until
//! midnight, since a clock hour never reaches 24.

use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use super::error::{SchedulerError, SchedulerResult};

/// Default first hour of the window
pub const DEFAULT_START_HOUR: u32 = 8;

/// Default last hour of the window
pub const DEFAULT_END_HOUR: u32 = 24;

/// Default event time zone (CET/CEST)
pub const DEFAULT_TIMEZONE: &str = "Europe/Paris";

/// Hours of the day during which polling may fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperatingWindow {
    start_hour: u32,
    end_hour: u32,
    #[serde(serialize_with = "serialize_tz")]
    timezone: Tz,
}

fn serialize_tz<S: serde::Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tz.name())
}

impl OperatingWindow {
    /// Create a window
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidHour` for hours above 24 and
    /// `SchedulerError::InvalidWindow` when `end_hour < start_hour`
    pub fn new(start_hour: u32, end_hour: u32, timezone: Tz) -> SchedulerResult<Self> {
        for hour in [start_hour, end_hour] {
            if hour > 24 {
                return Err(SchedulerError::invalid_hour(hour));
            }
        }

        if end_hour < start_hour {
            return Err(SchedulerError::InvalidWindow {
                start_hour,
                end_hour,
            });
        }

        Ok(Self {
            start_hour,
            end_hour,
            timezone,
        })
    }

    /// Create a window from a tz database name
    ///
    /// # Errors
    ///
    /// Returns `SchedulerError::InvalidTimezone` for unknown names, plus the
    /// errors of [`OperatingWindow::new`]
    pub fn from_names(start_hour: u32, end_hour: u32, timezone: &str) -> SchedulerResult<Self> {
        let tz = timezone
            .parse::<Tz>()
            .map_err(|_| SchedulerError::invalid_timezone(timezone))?;
        Self::new(start_hour, end_hour, tz)
    }

    /// A window that never closes
    pub fn always_open() -> Self {
        Self {
            start_hour: 0,
            end_hour: 24,
            timezone: Tz::UTC,
        }
    }

    /// Hour of `now` in the window's time zone
    pub fn local_hour(&self, now: DateTime<Utc>) -> u32 {
        now.with_timezone(&self.timezone).hour()
    }

    /// Whether polling may fetch at `now`
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let hour = self.local_hour(now);
        self.start_hour <= hour && hour <= self.end_hour
    }

    pub fn start_hour(&self) -> u32 {
        self.start_hour
    }

    pub fn end_hour(&self) -> u32 {
        self.end_hour
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }
}

impl Default for OperatingWindow {
    fn default() -> Self {
        Self {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            timezone: chrono_tz::Europe::Paris,
        }
    }
}
