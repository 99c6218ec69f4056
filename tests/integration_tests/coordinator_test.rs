//! Coordinator cycle tests
//!
//! Tests cover:
//! - Operating window gating (no network I/O while idle)
//! - Forced refreshes and the one-shot force flag
//! - Failure handling and snapshot retention
//! - Timeouts and coalescing of concurrent forced refreshes

use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

use medalwatch::coordinator::{CoordinatorOptions, CycleOutcome, MedalCoordinator};
use medalwatch::countries;
use medalwatch::models::MedalRecord;
use medalwatch::parser::ParseOutcome;
use medalwatch::scheduler::OperatingWindow;
use medalwatch::utils::error::{FetchError, UpdateError};

use crate::common::{self, FakeSource};

fn norway() -> MedalRecord {
    MedalRecord::new("1", 12, 7, 6)
}

// ============================================================================
// Window Gating Tests
// ============================================================================

#[tokio::test]
async fn test_idle_outside_window_makes_no_request() {
    let source = FakeSource::medal_table();
    let clock = common::night_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);

    // Creation sets the force flag, so the first cycle fetches at night
    let first = coordinator.run_cycle().await.unwrap();
    assert!(first.fetched());
    assert_eq!(source.calls(), 1);

    for _ in 0..3 {
        let outcome = coordinator.run_cycle().await.unwrap();
        assert_eq!(outcome, CycleOutcome::Idle(norway()));
    }
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_fetches_again_once_window_opens() {
    let source = FakeSource::medal_table();
    let clock = common::night_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);

    coordinator.run_cycle().await.unwrap();
    coordinator.run_cycle().await.unwrap();
    assert_eq!(source.calls(), 1);

    // 07:00 UTC is 08:00 in Paris, the first open hour
    clock.set(Utc.with_ymd_and_hms(2026, 2, 10, 7, 0, 0).unwrap());
    let outcome = coordinator.run_cycle().await.unwrap();
    assert!(outcome.fetched());
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_window_follows_local_time_zone() {
    let source = FakeSource::medal_table();
    // 23:00 UTC in February is midnight in Paris, outside the window
    let clock = common::clock_at_utc(23);
    let coordinator = common::coordinator("NOR", source.clone(), &clock);
    coordinator.run_cycle().await.unwrap();

    let outcome = coordinator.run_cycle().await.unwrap();
    assert!(!outcome.fetched());

    // 22:00 UTC is 23:00 in Paris, inside
    clock.set(Utc.with_ymd_and_hms(2026, 2, 10, 22, 0, 0).unwrap());
    assert!(coordinator.run_cycle().await.unwrap().fetched());
}

#[tokio::test]
async fn test_always_open_window() {
    let source = FakeSource::medal_table();
    let clock = common::night_clock();
    let options = common::options_with_clock(&clock).with_window(OperatingWindow::always_open());
    let coordinator =
        MedalCoordinator::new(countries::lookup("NOR").unwrap(), source.clone(), options);

    for _ in 0..3 {
        assert!(coordinator.run_cycle().await.unwrap().fetched());
    }
    assert_eq!(source.calls(), 3);
}

// ============================================================================
// Forced Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_forced_refresh_outside_window() {
    let source = FakeSource::medal_table();
    let clock = common::night_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);
    coordinator.run_cycle().await.unwrap();
    assert!(!coordinator.is_force_pending());

    let outcome = coordinator.force_refresh().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Updated(ParseOutcome::Found(norway())));
    assert_eq!(source.calls(), 2);

    // One-shot: the next scheduled cycle is gated again
    assert!(!coordinator.is_force_pending());
    assert!(!coordinator.run_cycle().await.unwrap().fetched());
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_request_refresh_applies_to_next_cycle() {
    let source = FakeSource::medal_table();
    let clock = common::night_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);
    coordinator.run_cycle().await.unwrap();

    coordinator.request_refresh();
    assert!(coordinator.state().force_flag);

    assert!(coordinator.run_cycle().await.unwrap().fetched());
    assert!(!coordinator.state().force_flag);
}

#[tokio::test]
async fn test_force_flag_cleared_after_failed_fetch() {
    let source = FakeSource::medal_table();
    let clock = common::night_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);
    coordinator.run_cycle().await.unwrap();

    source.set_failing(true);
    assert!(coordinator.force_refresh().await.is_err());
    assert!(!coordinator.is_force_pending());

    // No retry until the window opens or another force arrives
    assert!(!coordinator.run_cycle().await.unwrap().fetched());
    assert_eq!(source.calls(), 2);
}

// ============================================================================
// Failure Tests
// ============================================================================

#[tokio::test]
async fn test_failure_keeps_last_good_record() {
    let source = FakeSource::medal_table();
    let clock = common::daytime_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);
    coordinator.run_cycle().await.unwrap();

    source.set_failing(true);
    let err = coordinator.run_cycle().await.unwrap_err();
    assert!(matches!(err, UpdateError::Fetch(FetchError::Status(503))));

    assert_eq!(coordinator.current_medals(), norway());
    let status = coordinator.update_status();
    assert!(!status.last_update_success);
    assert_eq!(status.consecutive_failures, 1);
    assert!(status.last_success_at.is_some());
}

#[tokio::test]
async fn test_zero_record_when_never_succeeded() {
    let source = FakeSource::medal_table();
    source.set_failing(true);
    let clock = common::daytime_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);

    assert_eq!(coordinator.snapshot(), None);
    assert!(coordinator.run_cycle().await.is_err());

    assert_eq!(coordinator.snapshot(), Some(MedalRecord::zero()));
    assert_eq!(coordinator.current_medals(), MedalRecord::zero());
    assert_eq!(coordinator.update_status().last_success_at, None);
}

#[tokio::test]
async fn test_recovers_after_failures() {
    let source = FakeSource::medal_table();
    source.set_failing(true);
    let clock = common::daytime_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);

    for _ in 0..3 {
        let _ = coordinator.run_cycle().await;
    }
    assert_eq!(coordinator.update_status().consecutive_failures, 3);

    source.set_failing(false);
    coordinator.run_cycle().await.unwrap();
    assert_eq!(coordinator.current_medals(), norway());
    assert_eq!(coordinator.update_status().consecutive_failures, 0);
}

#[tokio::test]
async fn test_table_missing_replaces_record_with_zero() {
    let source = FakeSource::medal_table();
    let clock = common::daytime_clock();
    let coordinator = common::coordinator("NOR", source.clone(), &clock);
    coordinator.run_cycle().await.unwrap();

    source.set_html(common::load_fixture("no_table.html"));
    let outcome = coordinator.run_cycle().await.unwrap();

    // A fetched page is authoritative even when it has no table
    assert_eq!(outcome, CycleOutcome::Updated(ParseOutcome::TableMissing));
    assert!(coordinator.current_medals().is_zero());
    let status = coordinator.update_status();
    assert!(status.last_update_success);
    assert_eq!(status.last_parse_outcome, Some("table_missing"));
}

#[tokio::test]
async fn test_country_not_listed() {
    let source = FakeSource::medal_table();
    let clock = common::daytime_clock();
    let coordinator = common::coordinator("FRA", source, &clock);

    let outcome = coordinator.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Updated(ParseOutcome::NotListed));
    assert_eq!(coordinator.snapshot(), Some(MedalRecord::zero()));
    assert_eq!(coordinator.update_status().last_parse_outcome, Some("not_listed"));
}

// ============================================================================
// Timing Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_fetch_times_out() {
    let source = FakeSource::medal_table();
    source.set_delay(Duration::from_secs(120));
    let clock = common::daytime_clock();
    let options = common::options_with_clock(&clock).with_fetch_timeout(Duration::from_secs(30));
    let coordinator =
        MedalCoordinator::new(countries::lookup("NOR").unwrap(), source.clone(), options);

    let err = coordinator.run_cycle().await.unwrap_err();
    assert!(matches!(err, UpdateError::Timeout(t) if t == Duration::from_secs(30)));
    assert!(err.is_recoverable());
    assert_eq!(coordinator.current_medals(), MedalRecord::zero());
    assert!(!coordinator.is_force_pending());
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_forced_refreshes_coalesce() {
    let source = FakeSource::medal_table();
    let clock = common::night_clock();
    let coordinator = Arc::new(common::coordinator("NOR", source.clone(), &clock));
    coordinator.run_cycle().await.unwrap();
    source.set_delay(Duration::from_secs(5));

    let (first, second) = tokio::join!(coordinator.force_refresh(), coordinator.force_refresh());
    let outcomes = [first.unwrap(), second.unwrap()];

    assert_eq!(outcomes.iter().filter(|o| o.fetched()).count(), 1);
    assert!(outcomes.contains(&CycleOutcome::Coalesced(norway())));
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_force_during_scheduled_cycle_coalesces() {
    let source = FakeSource::medal_table();
    let clock = common::daytime_clock();
    let coordinator = Arc::new(common::coordinator("NOR", source.clone(), &clock));
    coordinator.run_cycle().await.unwrap();
    source.set_delay(Duration::from_secs(5));

    let scheduled = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.run_cycle().await }
    });

    // Let the scheduled cycle take the lock and start fetching
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.calls(), 2);

    let forced = coordinator.force_refresh().await.unwrap();
    assert!(scheduled.await.unwrap().unwrap().fetched());

    assert_eq!(forced, CycleOutcome::Coalesced(norway()));
    assert_eq!(source.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_force_joining_failed_cycle_reports_failure() {
    let source = FakeSource::medal_table();
    let clock = common::daytime_clock();
    let coordinator = Arc::new(common::coordinator("NOR", source.clone(), &clock));
    coordinator.run_cycle().await.unwrap();
    source.set_delay(Duration::from_secs(5));
    source.set_failing(true);

    let scheduled = tokio::spawn({
        let coordinator = coordinator.clone();
        async move { coordinator.run_cycle().await }
    });

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(source.calls(), 2);

    let forced = coordinator.force_refresh().await;
    assert!(scheduled.await.unwrap().is_err());

    let err = forced.unwrap_err();
    assert!(matches!(err, UpdateError::InFlightFailed(ref reason) if reason.contains("503")));
    assert!(err.is_recoverable());
    assert_eq!(source.calls(), 2);

    // Readers still see the last good record
    assert_eq!(coordinator.current_medals(), norway());
}

// ============================================================================
// Row Anomaly Tests
// ============================================================================

#[tokio::test]
async fn test_overflowing_counts_do_not_stop_the_cycle() {
    let html = r#"<html><body><table class="wikitable sortable">
        <tr><th>Rank</th><th>NOC</th><th>Gold</th><th>Silver</th><th>Bronze</th><th>Total</th></tr>
        <tr><td>1</td><th><a>Norway</a></th><td>4294967295</td><td>1</td><td>0</td><td>0</td></tr>
        <tr><td>2</td><th><a>Sweden</a></th><td>4</td><td>4</td><td>1</td><td>9</td></tr>
    </table></body></html>"#;
    let source = FakeSource::new(html);
    let clock = common::daytime_clock();

    let norway = common::coordinator("NOR", source.clone(), &clock);
    let outcome = norway.run_cycle().await.unwrap();
    assert_eq!(outcome, CycleOutcome::Updated(ParseOutcome::NotListed));
    assert!(norway.current_medals().is_zero());

    // Later rows of the same page still parse
    let sweden = common::coordinator("SWE", source, &clock);
    assert_eq!(sweden.current_medals(), MedalRecord::zero());
    sweden.run_cycle().await.unwrap();
    assert_eq!(sweden.current_medals(), MedalRecord::new("2", 4, 4, 1));
}

// ============================================================================
// Reader Tests
// ============================================================================

#[tokio::test]
async fn test_subscribers_see_new_records() {
    let source = FakeSource::medal_table();
    let clock = common::daytime_clock();
    let coordinator = common::coordinator("SWE", source, &clock);
    let mut rx = coordinator.subscribe();
    assert_eq!(*rx.borrow(), None);

    coordinator.run_cycle().await.unwrap();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow_and_update(), Some(MedalRecord::new("4", 4, 4, 1)));
}

#[tokio::test]
async fn test_options_from_default_config() {
    let config = medalwatch::config::Config::default();
    let options = CoordinatorOptions::from_config(&config).unwrap();
    assert_eq!(options.window, OperatingWindow::default());
    assert_eq!(options.fetch_timeout, Duration::from_secs(30));
}
