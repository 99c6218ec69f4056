//! Prometheus metrics for medal tracking
//!
//! This module provides metrics tracking for:
//! - Tracker: refresh cycles by outcome, fetch duration, parse outcomes
//! - Medals: current counts per country and medal kind
//! - API: request counts and durations
//!
//! # Usage
//!
//! Call `init_metrics()` at application startup to register all metrics.
//! If initialization fails, metrics operations become no-ops.

use prometheus::{
    register_counter_vec, register_gauge, register_gauge_vec, register_histogram_vec,
    CounterVec, Encoder, Gauge, GaugeVec, HistogramVec, TextEncoder,
};
use std::sync::OnceLock;

use crate::models::{MedalKind, MedalRecord};

// ============================================================================
// Metrics Storage
// ============================================================================

/// Container for tracker metrics
struct TrackerMetrics {
    tracked_countries: Gauge,
    cycles: CounterVec,
    parse_outcomes: CounterVec,
    fetch_duration: HistogramVec,
    medals: GaugeVec,
    rank: GaugeVec,
    consecutive_failures: GaugeVec,
}

/// Container for API metrics
struct ApiMetrics {
    requests: CounterVec,
    duration: HistogramVec,
}

static TRACKER_METRICS: OnceLock<TrackerMetrics> = OnceLock::new();

static API_METRICS: OnceLock<ApiMetrics> = OnceLock::new();

/// Flag to track if initialization was attempted
static METRICS_INIT_ATTEMPTED: OnceLock<bool> = OnceLock::new();

// ============================================================================
// Initialization
// ============================================================================

/// Initialize all Prometheus metrics
///
/// Call once at startup. If registration fails the error is returned and
/// every recording function stays a no-op.
///
/// # Example
///
/// ```ignore
/// if let Err(e) = medalwatch::metrics::init_metrics() {
///     eprintln!("Warning: Metrics initialization failed: {}", e);
/// }
/// ```
pub fn init_metrics() -> Result<(), Box<dyn std::error::Error>> {
    if METRICS_INIT_ATTEMPTED.get().is_some() {
        return Ok(());
    }
    METRICS_INIT_ATTEMPTED.set(true).ok();

    let tracker = TrackerMetrics {
        tracked_countries: register_gauge!(
            "medalwatch_tracked_countries",
            "Number of countries currently tracked"
        )?,
        cycles: register_counter_vec!(
            "medalwatch_refresh_cycles_total",
            "Refresh cycles by country and outcome",
            &["country", "outcome"]
        )?,
        parse_outcomes: register_counter_vec!(
            "medalwatch_parse_outcomes_total",
            "Parse results by country (found, not_listed, table_missing)",
            &["country", "outcome"]
        )?,
        fetch_duration: register_histogram_vec!(
            "medalwatch_fetch_duration_seconds",
            "Time spent fetching and parsing the medal page",
            &["country"],
            vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0]
        )?,
        medals: register_gauge_vec!(
            "medalwatch_medals",
            "Current medal count by country and kind",
            &["country", "kind"]
        )?,
        rank: register_gauge_vec!(
            "medalwatch_rank",
            "Current table rank by country (absent while unranked)",
            &["country"]
        )?,
        consecutive_failures: register_gauge_vec!(
            "medalwatch_consecutive_failures",
            "Failed fetch attempts since the last success",
            &["country"]
        )?,
    };

    let api = ApiMetrics {
        requests: register_counter_vec!(
            "medalwatch_api_requests_total",
            "Total API requests by endpoint and status",
            &["endpoint", "status"]
        )?,
        duration: register_histogram_vec!(
            "medalwatch_api_request_duration_seconds",
            "API request duration in seconds",
            &["endpoint"],
            vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
        )?,
    };

    TRACKER_METRICS
        .set(tracker)
        .map_err(|_| "Tracker metrics already initialized")?;
    API_METRICS
        .set(api)
        .map_err(|_| "API metrics already initialized")?;

    tracing::info!("Prometheus metrics initialized successfully");
    Ok(())
}

/// Check if metrics have been initialized
pub fn metrics_initialized() -> bool {
    TRACKER_METRICS.get().is_some() && API_METRICS.get().is_some()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Encode all metrics to Prometheus text format
pub fn encode_metrics() -> Result<String, Box<dyn std::error::Error>> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

/// Update the number of tracked countries
pub fn set_tracked_countries(count: usize) {
    if let Some(m) = TRACKER_METRICS.get() {
        m.tracked_countries.set(count as f64);
    }
}

/// Record a finished refresh cycle
///
/// `outcome` is one of `updated`, `idle`, `coalesced` or `failed`.
pub fn record_cycle(country: &str, outcome: &str) {
    if let Some(m) = TRACKER_METRICS.get() {
        m.cycles.with_label_values(&[country, outcome]).inc();
    }
}

/// Record the result of parsing a fetched page
pub fn record_parse_outcome(country: &str, outcome: &str) {
    if let Some(m) = TRACKER_METRICS.get() {
        m.parse_outcomes.with_label_values(&[country, outcome]).inc();
    }
}

/// Publish a country's current medal record
pub fn set_medal_gauges(country: &str, record: &MedalRecord) {
    let Some(m) = TRACKER_METRICS.get() else {
        return;
    };

    for kind in MedalKind::all() {
        m.medals
            .with_label_values(&[country, kind.as_str()])
            .set(f64::from(record.count(kind)));
    }

    match record.rank().parse::<u32>() {
        Ok(rank) => m.rank.with_label_values(&[country]).set(f64::from(rank)),
        Err(_) => {
            let _ = m.rank.remove_label_values(&[country]);
        }
    }
}

/// Publish a country's failure streak
pub fn set_consecutive_failures(country: &str, failures: u32) {
    if let Some(m) = TRACKER_METRICS.get() {
        m.consecutive_failures
            .with_label_values(&[country])
            .set(f64::from(failures));
    }
}

/// Drop every series of a country that is no longer tracked
pub fn forget_country(country: &str) {
    let Some(m) = TRACKER_METRICS.get() else {
        return;
    };

    for kind in MedalKind::all() {
        let _ = m.medals.remove_label_values(&[country, kind.as_str()]);
    }
    let _ = m.rank.remove_label_values(&[country]);
    let _ = m.consecutive_failures.remove_label_values(&[country]);
}

/// Record API request
pub fn record_api_request(endpoint: &str, status: u16, duration_secs: f64) {
    let Some(m) = API_METRICS.get() else {
        return;
    };

    let status_str = status.to_string();
    m.requests.with_label_values(&[endpoint, &status_str]).inc();
    m.duration
        .with_label_values(&[endpoint])
        .observe(duration_secs);
}

/// Histogram timer guard that records duration on drop
pub struct MetricsTimer {
    timer: Option<prometheus::HistogramTimer>,
}

impl MetricsTimer {
    fn new(timer: prometheus::HistogramTimer) -> Self {
        Self { timer: Some(timer) }
    }

    /// Create a no-op timer when metrics are not initialized
    fn noop() -> Self {
        Self { timer: None }
    }
}

impl Drop for MetricsTimer {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.stop_and_record();
        }
    }
}

/// Start a fetch timer for a country
pub fn start_fetch_timer(country: &str) -> MetricsTimer {
    match TRACKER_METRICS.get() {
        Some(m) => MetricsTimer::new(
            m.fetch_duration
                .with_label_values(&[country])
                .start_timer(),
        ),
        None => MetricsTimer::noop(),
    }
}

// ============================================================================
// Tests
// ============================================================================
