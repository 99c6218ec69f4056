//! REST API handlers
//!
//! This module defines the API routes and handlers for reading medal
//! snapshots and forcing refreshes.

use axum::{
    extract::{MatchedPath, Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::coordinator::{
    CoordinatorState, MedalCoordinator, RefreshRequest, RefreshTarget, UpdateStatus,
};
use crate::countries::{self, CountryRef};
use crate::metrics;
use crate::models::MedalRecord;
use crate::sensor::{DeviceInfo, MedalSensor, SensorReading};

use super::server::AppState;

// ============================================================================
// API Response Types
// ============================================================================

/// Generic API response wrapper
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

/// Simple error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub tracked_countries: usize,
}

/// Current medals of one tracked entry
#[derive(Debug, Serialize)]
pub struct MedalsResponse {
    pub entry_id: String,
    pub country: CountryRef,
    pub medals: MedalRecord,
    pub last_update_success: bool,
}

/// Sensor readings of one country
#[derive(Debug, Serialize)]
pub struct SensorsResponse {
    pub device: DeviceInfo,
    pub sensors: Vec<SensorReading>,
}

/// Coordinator state and update health
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub state: CoordinatorState,
    pub update: UpdateStatus,
}

// ============================================================================
// API Routes
// ============================================================================

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/api/health", get(health_check))
        // Registry endpoints
        .route("/api/countries", get(list_countries))
        // Medal endpoints
        .route("/api/medals", get(list_medals))
        .route("/api/medals/{code}", get(get_medals))
        .route("/api/medals/{code}/sensors", get(get_sensors))
        .route("/api/medals/{code}/status", get(get_status))
        // Control endpoints
        .route("/api/refresh", post(force_refresh))
        // Prometheus
        .route("/metrics", get(prometheus_metrics))
        .layer(middleware::from_fn(track_api_metrics))
        .with_state(state)
}

/// Record request count and duration per matched route
async fn track_api_metrics(request: Request, next: Next) -> Response {
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let started = Instant::now();
    let response = next.run(request).await;

    metrics::record_api_request(
        &endpoint,
        response.status().as_u16(),
        started.elapsed().as_secs_f64(),
    );
    response
}

fn not_tracked(code: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(format!("Country not tracked: {}", code))),
    )
        .into_response()
}

async fn find_entry(state: &AppState, code: &str) -> Option<(String, Arc<MedalCoordinator>)> {
    state
        .registry
        .coordinators()
        .await
        .into_iter()
        .find(|(_, c)| c.code().eq_ignore_ascii_case(code))
}

fn medals_response(entry_id: String, coordinator: &MedalCoordinator) -> MedalsResponse {
    MedalsResponse {
        entry_id,
        country: *coordinator.country(),
        medals: coordinator.current_medals(),
        last_update_success: coordinator.update_status().last_update_success,
    }
}

// ============================================================================
// Health Handlers
// ============================================================================

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let uptime = state.start_time.elapsed().as_secs();

    Json(ApiResponse::success(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime,
        tracked_countries: state.registry.len().await,
    }))
}

// ============================================================================
// Registry Handlers
// ============================================================================

/// Trackable countries in selection order
async fn list_countries() -> impl IntoResponse {
    Json(ApiResponse::success(countries::sorted_by_name()))
}

// ============================================================================
// Medal Handlers
// ============================================================================

/// Current medals of every tracked country
async fn list_medals(State(state): State<AppState>) -> impl IntoResponse {
    let medals: Vec<MedalsResponse> = state
        .registry
        .coordinators()
        .await
        .into_iter()
        .map(|(entry_id, c)| medals_response(entry_id, &c))
        .collect();

    Json(ApiResponse::success(medals))
}

/// Current medals of one country
async fn get_medals(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match find_entry(&state, &code).await {
        Some((entry_id, c)) => {
            (StatusCode::OK, Json(ApiResponse::success(medals_response(entry_id, &c)))).into_response()
        }
        None => not_tracked(&code),
    }
}

/// Sensor readings of one country
async fn get_sensors(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    let Some((_, coordinator)) = find_entry(&state, &code).await else {
        return not_tracked(&code);
    };

    let sensors = MedalSensor::for_country(coordinator.country())
        .iter()
        .map(|s| s.read(&coordinator))
        .collect();

    (
        StatusCode::OK,
        Json(ApiResponse::success(SensorsResponse {
            device: DeviceInfo::for_country(coordinator.country()),
            sensors,
        })),
    )
        .into_response()
}

/// Coordinator state and update health of one country
async fn get_status(State(state): State<AppState>, Path(code): Path<String>) -> Response {
    match find_entry(&state, &code).await {
        Some((_, c)) => (
            StatusCode::OK,
            Json(ApiResponse::success(StatusResponse {
                state: c.state(),
                update: c.update_status(),
            })),
        )
            .into_response(),
        None => not_tracked(&code),
    }
}

// ============================================================================
// Control Handlers
// ============================================================================

/// Force an immediate refresh of one country or all
async fn force_refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Response {
    let target = RefreshTarget::from_arg(&request.country);

    if let RefreshTarget::Country(code) = &target {
        if countries::lookup(code).is_none() {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(format!("Unknown country code: {}", code))),
            )
                .into_response();
        }
    }

    let reports = state.dispatcher.force_refresh(&target).await;

    if reports.is_empty() && target != RefreshTarget::All {
        return not_tracked(&target.to_string());
    }

    (StatusCode::OK, Json(ApiResponse::success(reports))).into_response()
}

// ============================================================================
// Metrics Handlers
// ============================================================================

/// Prometheus text exposition
async fn prometheus_metrics() -> Response {
    match metrics::encode_metrics() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(format!("Failed to encode metrics: {}", e))),
        )
            .into_response(),
    }
}

// ============================================================================
// Tests
// ============================================================================
