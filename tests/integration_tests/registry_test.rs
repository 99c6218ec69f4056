//! Registry and refresh dispatch tests
//!
//! Tests cover:
//! - Tracking and untracking countries
//! - Polling tasks driven by the update interval
//! - Forced refresh dispatch to one country or all

use std::time::Duration;

use medalwatch::coordinator::{RefreshDispatcher, RefreshTarget};
use medalwatch::models::MedalRecord;
use medalwatch::utils::error::RegistryError;

use crate::common::{self, FakeSource};

// ============================================================================
// Registry Tests
// ============================================================================

#[tokio::test]
async fn test_track_runs_first_cycle() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());

    let coordinator = registry.track("nor", "NOR").await.unwrap();

    assert_eq!(source.calls(), 1);
    assert_eq!(coordinator.current_medals(), MedalRecord::new("1", 12, 7, 6));
    assert!(!coordinator.is_force_pending());
    registry.shutdown().await;
}

#[tokio::test]
async fn test_track_survives_failed_first_cycle() {
    let source = FakeSource::medal_table();
    source.set_failing(true);
    let registry = common::registry(source.clone(), &common::daytime_clock());

    let coordinator = registry.track("nor", "NOR").await.unwrap();

    assert_eq!(coordinator.snapshot(), Some(MedalRecord::zero()));
    assert!(!coordinator.update_status().last_update_success);
    assert_eq!(registry.len().await, 1);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_entries_are_sorted_by_code() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source, &common::daytime_clock());

    registry.track("sweden", "swe").await.unwrap();
    registry.track("italy", "ITA").await.unwrap();
    registry.track("norway", "NOR").await.unwrap();

    let codes: Vec<_> = registry
        .entries()
        .await
        .into_iter()
        .map(|e| e.country.code)
        .collect();
    assert_eq!(codes, vec!["ITA", "NOR", "SWE"]);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_untrack_removes_entry() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source, &common::daytime_clock());
    registry.track("nor", "NOR").await.unwrap();

    let removed = registry.untrack("nor").await.unwrap();
    assert_eq!(removed.code(), "NOR");
    assert!(registry.is_empty().await);
    assert!(registry.find_country("NOR").await.is_none());

    // The country can be tracked again under a new entry
    registry.track("norway-again", "NOR").await.unwrap();
    assert_eq!(
        registry.untrack("nor").await.unwrap_err(),
        RegistryError::EntryNotFound("nor".to_string())
    );
    registry.shutdown().await;
}

#[tokio::test]
async fn test_unknown_code_is_rejected_without_fetching() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::daytime_clock());

    let err = registry.track("x", "XYZ").await.unwrap_err();
    assert_eq!(err, RegistryError::UnknownCountry("XYZ".to_string()));
    assert_eq!(source.calls(), 0);
}

// ============================================================================
// Polling Task Tests
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_polling_task_refreshes_each_interval() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::daytime_clock());
    registry.track("nor", "NOR").await.unwrap();
    assert_eq!(source.calls(), 1);

    tokio::time::sleep(Duration::from_secs(3600 * 2 + 1)).await;
    assert_eq!(source.calls(), 3);

    registry.shutdown().await;
    tokio::time::sleep(Duration::from_secs(3600 * 2)).await;
    assert_eq!(source.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_polling_task_idles_outside_window() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());
    let coordinator = registry.track("nor", "NOR").await.unwrap();

    tokio::time::sleep(Duration::from_secs(3600 * 3 + 1)).await;

    assert_eq!(source.calls(), 1);
    assert_eq!(coordinator.current_medals(), MedalRecord::new("1", 12, 7, 6));
    registry.shutdown().await;
}

// ============================================================================
// Dispatch Tests
// ============================================================================

#[tokio::test]
async fn test_dispatch_all_refreshes_every_country() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());
    registry.track("nor", "NOR").await.unwrap();
    registry.track("ger", "GER").await.unwrap();
    assert_eq!(source.calls(), 2);

    let dispatcher = RefreshDispatcher::new(registry.clone());
    let reports = dispatcher.force_refresh(&RefreshTarget::All).await;

    assert_eq!(reports.len(), 2);
    assert!(reports.iter().all(|r| r.success && r.outcome == "updated"));
    assert_eq!(source.calls(), 4);

    let germany = reports.iter().find(|r| r.country_code == "GER").unwrap();
    assert_eq!(germany.entry_id, "ger");
    assert_eq!(germany.record, MedalRecord::new("2", 8, 4, 3));
    registry.shutdown().await;
}

#[tokio::test]
async fn test_dispatch_single_country() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());
    registry.track("nor", "NOR").await.unwrap();
    registry.track("ger", "GER").await.unwrap();

    let dispatcher = RefreshDispatcher::new(registry.clone());
    let reports = dispatcher
        .force_refresh(&RefreshTarget::from_arg("ger"))
        .await;

    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].country_code, "GER");
    assert_eq!(source.calls(), 3);

    // Forcing one country leaves the others gated
    let norway = registry.find_country("NOR").await.unwrap();
    assert!(!norway.is_force_pending());
    registry.shutdown().await;
}

#[tokio::test]
async fn test_dispatch_to_untracked_country_is_empty() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());
    registry.track("nor", "NOR").await.unwrap();

    let dispatcher = RefreshDispatcher::new(registry.clone());
    let reports = dispatcher
        .force_refresh(&RefreshTarget::Country("FIN".to_string()))
        .await;

    assert!(reports.is_empty());
    assert_eq!(source.calls(), 1);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_dispatch_reports_failures() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());
    registry.track("nor", "NOR").await.unwrap();
    source.set_failing(true);

    let dispatcher = RefreshDispatcher::new(registry.clone());
    let reports = dispatcher.force_refresh(&RefreshTarget::All).await;

    assert_eq!(reports.len(), 1);
    let report = &reports[0];
    assert!(!report.success);
    assert_eq!(report.outcome, "failed");
    assert!(report.error.as_deref().unwrap().contains("503"));
    // Readers keep the last good record
    assert_eq!(report.record, MedalRecord::new("1", 12, 7, 6));
    registry.shutdown().await;
}

#[test]
fn test_dispatch_from_blocking_context() {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());

    let reports = tokio_test::block_on(async {
        let dispatcher = RefreshDispatcher::new(registry.clone());
        dispatcher.force_refresh(&RefreshTarget::All).await
    });

    assert!(reports.is_empty());
    assert_eq!(source.calls(), 0);
}
