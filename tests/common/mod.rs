//! Common test utilities

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use medalwatch::coordinator::{CoordinatorOptions, MedalCoordinator, TrackerRegistry};
use medalwatch::countries;
use medalwatch::crawler::{FetchedPage, PageSource};
use medalwatch::scheduler::FixedClock;
use medalwatch::utils::error::FetchError;

/// Test fixture paths
pub const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/html");

pub fn load_fixture(filename: &str) -> String {
    let path = format!("{FIXTURES_DIR}/{filename}");
    std::fs::read_to_string(&path).unwrap_or_else(|_| panic!("Failed to load fixture: {path}"))
}

/// In-memory page source with a call counter
///
/// Serves the medal table fixture until told otherwise. Failures and
/// delays can be switched on between cycles.
pub struct FakeSource {
    html: Mutex<String>,
    calls: AtomicUsize,
    fail: AtomicBool,
    delay: Mutex<Option<Duration>>,
}

impl FakeSource {
    pub fn new(html: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            html: Mutex::new(html.into()),
            calls: AtomicUsize::new(0),
            fail: AtomicBool::new(false),
            delay: Mutex::new(None),
        })
    }

    pub fn medal_table() -> Arc<Self> {
        Self::new(load_fixture("medal_table.html"))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn set_html(&self, html: impl Into<String>) {
        *self.html.lock().unwrap() = html.into();
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }
}

#[async_trait]
impl PageSource for FakeSource {
    async fn fetch_page(&self) -> Result<FetchedPage, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.fail.load(Ordering::SeqCst) {
            return Err(FetchError::Status(503));
        }

        let html = self.html.lock().unwrap().clone();
        Ok(FetchedPage::from_html(html))
    }
}

/// Clock fixed at the given UTC hour on 10 February 2026 (UTC+1 in Paris)
pub fn clock_at_utc(hour: u32) -> FixedClock {
    FixedClock::new(Utc.with_ymd_and_hms(2026, 2, 10, hour, 0, 0).unwrap())
}

/// 12:00 in Paris, inside the default window
pub fn daytime_clock() -> FixedClock {
    clock_at_utc(11)
}

/// 03:00 in Paris, outside the default window
pub fn night_clock() -> FixedClock {
    clock_at_utc(2)
}

pub fn options_with_clock(clock: &FixedClock) -> CoordinatorOptions {
    CoordinatorOptions::default().with_clock(Arc::new(clock.clone()))
}

/// Coordinator for `code` backed by `source`, not yet cycled
pub fn coordinator(
    code: &str,
    source: Arc<FakeSource>,
    clock: &FixedClock,
) -> MedalCoordinator {
    let country = countries::lookup(code).unwrap();
    MedalCoordinator::new(country, source, options_with_clock(clock))
}

/// Registry whose polling tasks tick once an hour, so tests drive cycles
pub fn registry(source: Arc<FakeSource>, clock: &FixedClock) -> Arc<TrackerRegistry> {
    Arc::new(TrackerRegistry::new(
        source,
        options_with_clock(clock),
        Duration::from_secs(3600),
    ))
}
