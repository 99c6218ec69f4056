//! HTTP API tests
//!
//! Requests go straight to the router with `tower::ServiceExt::oneshot`;
//! no socket is bound.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use medalwatch::api::{create_router, AppState};
use medalwatch::coordinator::TrackerRegistry;

use crate::common::{self, FakeSource};

async fn tracked(codes: &[&str]) -> (Arc<TrackerRegistry>, Arc<FakeSource>) {
    let source = FakeSource::medal_table();
    let registry = common::registry(source.clone(), &common::night_clock());
    for code in codes {
        registry
            .track(code.to_ascii_lowercase(), code)
            .await
            .unwrap();
    }
    (registry, source)
}

fn router(registry: &Arc<TrackerRegistry>) -> Router {
    create_router(AppState::new(registry.clone()))
}

async fn send(router: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    send(router, Request::get(uri).body(Body::empty()).unwrap()).await
}

async fn post_refresh(router: Router, country: &str) -> (StatusCode, Value) {
    let request = Request::post("/api/refresh")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "country": country }).to_string()))
        .unwrap();
    send(router, request).await
}

// ============================================================================
// Read Endpoints
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (registry, _) = tracked(&["NOR"]).await;
    let (status, body) = get(router(&registry), "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["tracked_countries"], 1);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_countries_sorted_by_name() {
    let (registry, _) = tracked(&[]).await;
    let (status, body) = get(router(&registry), "/api/countries").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["display_name"].as_str().unwrap())
        .collect();
    assert_eq!(names.first(), Some(&"Albania"));
    assert!(names.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_list_medals() {
    let (registry, _) = tracked(&["SWE", "NOR"]).await;
    let (status, body) = get(router(&registry), "/api/medals").await;

    assert_eq!(status, StatusCode::OK);
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["country"]["code"], "NOR");
    assert_eq!(data[1]["country"]["code"], "SWE");
    assert_eq!(data[1]["medals"]["rank"], "4");
    registry.shutdown().await;
}

#[tokio::test]
async fn test_get_medals_is_case_insensitive() {
    let (registry, _) = tracked(&["NOR"]).await;
    let (status, body) = get(router(&registry), "/api/medals/nor").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["entry_id"], "nor");
    assert_eq!(
        body["data"]["medals"],
        json!({"rank": "1", "gold": 12, "silver": 7, "bronze": 6, "total": 25})
    );
    assert_eq!(body["data"]["last_update_success"], true);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_untracked_country_is_404() {
    let (registry, _) = tracked(&["NOR"]).await;

    for uri in ["/api/medals/FRA", "/api/medals/FRA/sensors", "/api/medals/FRA/status"] {
        let (status, body) = get(router(&registry), uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        assert_eq!(body["success"], false);
    }
    registry.shutdown().await;
}

#[tokio::test]
async fn test_sensors() {
    let (registry, _) = tracked(&["NOR"]).await;
    let (status, body) = get(router(&registry), "/api/medals/NOR/sensors").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["device"]["name"], "Olympics 2026 - Norway");

    let sensors = body["data"]["sensors"].as_array().unwrap();
    assert_eq!(sensors.len(), 5);

    let gold = &sensors[0];
    assert_eq!(gold["unique_id"], "olympics_2026_NOR_gold_medals");
    assert_eq!(gold["name"], "Norway Gold Medals");
    assert_eq!(gold["value"], 12);
    assert_eq!(gold["attributes"]["rank"], "1");

    let rank = &sensors[4];
    assert_eq!(rank["unique_id"], "olympics_2026_NOR_rank");
    assert_eq!(rank["value"], "1");
    assert_eq!(rank["attributes"]["total"], 25);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_status_reports_failures() {
    let (registry, source) = tracked(&["NOR"]).await;
    source.set_failing(true);
    let _ = registry.find_country("NOR").await.unwrap().force_refresh().await;

    let (status, body) = get(router(&registry), "/api/medals/NOR/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["state"]["country_code"], "NOR");
    assert_eq!(body["data"]["state"]["force_flag"], false);
    assert_eq!(body["data"]["state"]["last_record"]["gold"], 12);
    assert_eq!(body["data"]["update"]["last_update_success"], false);
    assert_eq!(body["data"]["update"]["consecutive_failures"], 1);
    registry.shutdown().await;
}

// ============================================================================
// Control Endpoints
// ============================================================================

#[tokio::test]
async fn test_refresh_one_country() {
    let (registry, source) = tracked(&["NOR", "GER"]).await;
    let (status, body) = post_refresh(router(&registry), "ger").await;

    assert_eq!(status, StatusCode::OK);
    let reports = body["data"].as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["country_code"], "GER");
    assert_eq!(reports[0]["success"], true);
    assert_eq!(reports[0]["outcome"], "updated");
    assert_eq!(source.calls(), 3);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_refresh_all() {
    let (registry, source) = tracked(&["NOR", "GER"]).await;
    let (status, body) = post_refresh(router(&registry), "ALL").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(source.calls(), 4);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_refresh_unknown_code_is_400() {
    let (registry, source) = tracked(&["NOR"]).await;
    let (status, body) = post_refresh(router(&registry), "XYZ").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(source.calls(), 1);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_refresh_untracked_code_is_404() {
    let (registry, _) = tracked(&["NOR"]).await;
    let (status, _) = post_refresh(router(&registry), "FIN").await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    registry.shutdown().await;
}

#[tokio::test]
async fn test_refresh_all_with_nothing_tracked() {
    let (registry, _) = tracked(&[]).await;
    let (status, body) = post_refresh(router(&registry), "all").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    medalwatch::metrics::init_metrics().unwrap();
    let (registry, _) = tracked(&["NOR"]).await;

    let response = router(&registry)
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("medalwatch_medals"));
    registry.shutdown().await;
}
