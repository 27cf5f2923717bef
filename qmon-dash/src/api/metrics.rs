//! Dashboard view endpoints
//!
//! Each handler runs one façade operation on the blocking pool, since store
//! loading does synchronous file I/O.

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use qmon_common::analytics::timeline::DailyModelMatrix;
use qmon_common::query::views::{
    ActivityEntry, DebuggingPerformance, LabelRanking, ModelQualityScores, Overview,
    QualityTrendView, SystemHealth, TaskDistribution,
};
use qmon_common::query::{
    DEFAULT_ACTIVITY_LIMIT, DEFAULT_TIMELINE_DAYS, DEFAULT_TOP_K, DEFAULT_TREND_DAYS,
};
use qmon_common::QueryFacade;
use serde::Deserialize;
use std::sync::Arc;

use crate::{ApiError, AppState};

/// `?days=` for trend views (defaults to 30)
#[derive(Debug, Deserialize)]
pub struct TrendQuery {
    #[serde(default = "default_trend_days")]
    pub days: i64,
}

/// `?days=` for per-day and index views (defaults to 1)
#[derive(Debug, Deserialize)]
pub struct TimelineQuery {
    #[serde(default = "default_timeline_days")]
    pub days: i64,
}

#[derive(Debug, Deserialize)]
pub struct TopKQuery {
    #[serde(default = "default_top_k")]
    pub top_k: i64,
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_trend_days() -> i64 {
    DEFAULT_TREND_DAYS
}

fn default_timeline_days() -> i64 {
    DEFAULT_TIMELINE_DAYS
}

fn default_top_k() -> i64 {
    DEFAULT_TOP_K
}

fn default_limit() -> i64 {
    DEFAULT_ACTIVITY_LIMIT
}

pub fn metrics_routes() -> Router<AppState> {
    Router::new()
        .route("/api/overview", get(overview))
        .route("/api/quality-trends", get(quality_trends))
        .route("/api/skills", get(skills))
        .route("/api/agents", get(agents))
        .route("/api/task-distribution", get(task_distribution))
        .route("/api/recent-activity", get(recent_activity))
        .route("/api/system-health", get(system_health))
        .route("/api/quality-scores", get(quality_scores))
        .route("/api/quality-timeline", get(quality_timeline))
        .route("/api/debugging-performance", get(debugging_performance))
}

async fn run<T, F>(state: &AppState, op: F) -> Result<Json<T>, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&QueryFacade) -> qmon_common::Result<T> + Send + 'static,
{
    let facade = Arc::clone(&state.facade);
    let value = tokio::task::spawn_blocking(move || op(&facade))
        .await
        .map_err(|e| ApiError::Internal(format!("query task failed: {}", e)))??;
    Ok(Json(value))
}

/// GET /api/overview
pub async fn overview(State(state): State<AppState>) -> Result<Json<Overview>, ApiError> {
    run(&state, |facade| Ok(facade.overview())).await
}

/// GET /api/quality-trends?days=30
pub async fn quality_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendQuery>,
) -> Result<Json<QualityTrendView>, ApiError> {
    run(&state, move |facade| facade.quality_trend(query.days)).await
}

/// GET /api/skills?top_k=10
pub async fn skills(
    State(state): State<AppState>,
    Query(query): Query<TopKQuery>,
) -> Result<Json<LabelRanking>, ApiError> {
    run(&state, move |facade| facade.skill_performance(query.top_k)).await
}

/// GET /api/agents?top_k=10
pub async fn agents(
    State(state): State<AppState>,
    Query(query): Query<TopKQuery>,
) -> Result<Json<LabelRanking>, ApiError> {
    run(&state, move |facade| facade.agent_performance(query.top_k)).await
}

/// GET /api/task-distribution
pub async fn task_distribution(
    State(state): State<AppState>,
) -> Result<Json<TaskDistribution>, ApiError> {
    run(&state, |facade| Ok(facade.task_distribution())).await
}

/// GET /api/recent-activity?limit=20
pub async fn recent_activity(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<Vec<ActivityEntry>>, ApiError> {
    run(&state, move |facade| facade.recent_activity(query.limit)).await
}

/// GET /api/system-health
pub async fn system_health(State(state): State<AppState>) -> Result<Json<SystemHealth>, ApiError> {
    run(&state, |facade| Ok(facade.system_health())).await
}

/// GET /api/quality-scores
pub async fn quality_scores(
    State(state): State<AppState>,
) -> Result<Json<ModelQualityScores>, ApiError> {
    run(&state, |facade| Ok(facade.model_quality_scores())).await
}

/// GET /api/quality-timeline?days=1
pub async fn quality_timeline(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<DailyModelMatrix>, ApiError> {
    run(&state, move |facade| facade.timeline(query.days)).await
}

/// GET /api/debugging-performance?days=1
pub async fn debugging_performance(
    State(state): State<AppState>,
    Query(query): Query<TimelineQuery>,
) -> Result<Json<DebuggingPerformance>, ApiError> {
    run(&state, move |facade| facade.debugging_performance_index(query.days)).await
}
