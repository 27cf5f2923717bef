//! Integration tests for qmon-dash API endpoints
//!
//! Stores live in a temp directory; the façade runs on a manual clock fixed
//! at 2025-11-12T12:00:00Z.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use chrono::{TimeZone, Utc};
use qmon_common::config::DashboardConfig;
use qmon_common::time::ManualClock;
use qmon_common::QueryFacade;
use qmon_dash::{build_router, AppState};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot` method

/// Test helper: write store files into `dir`
fn seed_stores(dir: &Path) {
    let history = json!({"quality_assessments": [
        {"assessment_id": "qa-1", "timestamp": "2025-11-12T09:00:00Z", "task_type": "debugging",
         "overall_score": 72, "skills_used": ["code-analysis"], "duration_seconds": 40,
         "details": {"model_used": "GLM 4.6"}},
        {"assessment_id": "qa-2", "timestamp": "2025-11-12T10:00:00Z", "task_type": "debugging",
         "overall_score": 88, "skills_used": ["code-analysis"], "duration_seconds": 50,
         "details": {"model_used": "GLM 4.6"}}
    ]});
    let records = json!({"records": [
        {"timestamp": "2025-11-12T11:00:00Z", "task_type": "feature", "quality_score": 64,
         "agents_used": ["code-analyzer"], "model_used": "GLM 4.6", "success": false}
    ]});
    std::fs::write(dir.join("quality_history.json"), history.to_string()).unwrap();
    std::fs::write(dir.join("performance_records.json"), records.to_string()).unwrap();
}

/// Test helper: create app over `dir`
fn setup_app(dir: &Path) -> axum::Router {
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 11, 12, 12, 0, 0).unwrap(),
    ));
    let config = DashboardConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    };
    build_router(AppState::new(QueryFacade::new(&config, clock)))
}

fn test_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Test helper: Extract JSON body from response
async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(test_request(uri)).await.unwrap();
    let status = response.status();
    (status, extract_json(response.into_body()).await)
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let dir = TempDir::new().unwrap();
    let (status, json) = get_json(setup_app(dir.path()), "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["module"], "qmon-dash");
    assert!(json["version"].is_string());
}

// =============================================================================
// Views
// =============================================================================

#[tokio::test]
async fn test_overview() {
    let dir = TempDir::new().unwrap();
    seed_stores(dir.path());
    let (status, json) = get_json(setup_app(dir.path()), "/api/overview").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_assessments"], 3);
    assert_eq!(json["distinct_models"], 1);
    assert_eq!(json["records_by_source"]["quality_history"], 2);
    assert_eq!(json["records_by_source"]["performance_records"], 1);
}

#[tokio::test]
async fn test_quality_trends_default_window() {
    let dir = TempDir::new().unwrap();
    seed_stores(dir.path());
    let (status, json) = get_json(setup_app(dir.path()), "/api/quality-trends").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["window_days"], 30);
    assert_eq!(json["points"].as_array().unwrap().len(), 3);
    assert_eq!(json["rolling_average"].as_array().unwrap().len(), 3);
    // [72] vs [88, 64]: delta 4
    assert_eq!(json["trend"], "accelerating");
}

#[tokio::test]
async fn test_skills_and_agents() {
    let dir = TempDir::new().unwrap();
    seed_stores(dir.path());

    let (status, json) = get_json(setup_app(dir.path()), "/api/skills?top_k=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 1);
    assert_eq!(json["items"][0]["name"], "code-analysis");
    assert_eq!(json["items"][0]["usage_count"], 2);

    let (status, json) = get_json(setup_app(dir.path()), "/api/agents").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["items"][0]["name"], "code-analyzer");
    assert_eq!(json["items"][0]["success_rate"], 0.0);
}

#[tokio::test]
async fn test_task_distribution_and_activity() {
    let dir = TempDir::new().unwrap();
    seed_stores(dir.path());

    let (status, json) = get_json(setup_app(dir.path()), "/api/task-distribution").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total"], 3);
    assert_eq!(json["task_types"][0]["task_type"], "debugging");

    let (status, json) = get_json(setup_app(dir.path()), "/api/recent-activity?limit=1").await;
    assert_eq!(status, StatusCode::OK);
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["task_type"], "feature");
    assert_eq!(entries[0]["source"], "performance_records");
}

#[tokio::test]
async fn test_system_health() {
    let dir = TempDir::new().unwrap();
    seed_stores(dir.path());
    let (status, json) = get_json(setup_app(dir.path()), "/api/system-health").await;

    assert_eq!(status, StatusCode::OK);
    // 1 failure in 3 records
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["sample_size"], 3);
}

#[tokio::test]
async fn test_quality_scores_and_timeline() {
    let dir = TempDir::new().unwrap();
    seed_stores(dir.path());

    let (status, json) = get_json(setup_app(dir.path()), "/api/quality-scores").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["models"][0]["model"], "GLM 4.6");
    assert_eq!(json["models"][0]["task_count"], 3);
    assert_eq!(json["inferred_records"], 0);

    let (status, json) = get_json(setup_app(dir.path()), "/api/quality-timeline?days=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["days"].as_array().unwrap().len(), 1);
    assert_eq!(json["days"][0]["models"]["GLM 4.6"]["count"], 3);
}

#[tokio::test]
async fn test_debugging_performance() {
    let dir = TempDir::new().unwrap();
    seed_stores(dir.path());
    let (status, json) = get_json(setup_app(dir.path()), "/api/debugging-performance").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["window_days"], 1);
    assert_eq!(json["models"][0]["model"], "GLM 4.6");
    assert!(json["models"][0]["performance_index"].is_number());
    assert!(json["weights"]["quality_improvement"].is_number());
}

// =============================================================================
// Degraded input and validation
// =============================================================================

#[tokio::test]
async fn test_empty_data_dir_returns_sentinels() {
    let dir = TempDir::new().unwrap();

    let (status, json) = get_json(setup_app(dir.path()), "/api/overview").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["total_assessments"], 0);
    assert!(json["average_score"].is_null());

    let (_, json) = get_json(setup_app(dir.path()), "/api/quality-trends").await;
    assert_eq!(json["trend"], "insufficient_data");

    let (_, json) = get_json(setup_app(dir.path()), "/api/system-health").await;
    assert_eq!(json["status"], "no_data");
}

#[tokio::test]
async fn test_invalid_parameters_return_400() {
    let dir = TempDir::new().unwrap();

    for uri in [
        "/api/quality-trends?days=-1",
        "/api/quality-timeline?days=0",
        "/api/debugging-performance?days=4000",
        "/api/skills?top_k=0",
        "/api/recent-activity?limit=-3",
    ] {
        let (status, json) = get_json(setup_app(dir.path()), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
        assert_eq!(json["error"]["code"], "INVALID_INPUT", "{}", uri);
        assert!(json["error"]["message"].is_string());
    }
}

#[tokio::test]
async fn test_non_numeric_parameter_rejected() {
    let dir = TempDir::new().unwrap();
    let response = setup_app(dir.path())
        .oneshot(test_request("/api/quality-trends?days=abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
