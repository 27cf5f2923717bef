//! Plain data returned by the query façade

use crate::analytics::index::IndexBreakdown;
use crate::analytics::models::ModelStats;
use crate::analytics::trend::TrendResult;
use crate::record::{Attribution, Source};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    pub total_assessments: usize,
    pub average_score: Option<f64>,
    /// Fraction in [0, 1]
    pub success_rate: Option<f64>,
    pub distinct_skills: usize,
    pub distinct_agents: usize,
    pub distinct_task_types: usize,
    pub distinct_models: usize,
    pub records_by_source: BTreeMap<Source, usize>,
    pub stores_present: Vec<&'static str>,
    pub last_updated: Option<DateTime<Utc>>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityTrendView {
    #[serde(flatten)]
    pub trend: TrendResult,
    /// Trailing average aligned with `points`
    pub rolling_average: Vec<f64>,
}

/// Usage and outcome statistics for one skill or agent label
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelPerformance {
    pub name: String,
    pub usage_count: usize,
    /// Fraction in [0, 1]
    pub success_rate: f64,
    pub mean_score: f64,
    pub last_used: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelRanking {
    /// Distinct labels before truncation
    pub total: usize,
    pub items: Vec<LabelPerformance>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskTypeShare {
    pub task_type: String,
    pub count: usize,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDistribution {
    pub total: usize,
    pub task_types: Vec<TaskTypeShare>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityEntry {
    pub timestamp: DateTime<Utc>,
    pub task_type: String,
    pub overall_score: f64,
    pub success: bool,
    pub model_used: String,
    pub attribution: Attribution,
    pub source: Source,
    pub skills_used: Vec<String>,
    pub agents_used: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Excellent,
    Warning,
    Degraded,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SystemHealth {
    pub status: HealthStatus,
    pub sample_size: usize,
    /// Fraction of sampled records with `success = false`
    pub error_rate: Option<f64>,
    pub mean_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelQualityScores {
    pub models: Vec<ModelStats>,
    pub total_records: usize,
    /// Records whose model came from the date/time fallback
    pub inferred_records: usize,
    pub attribution_note: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexWeights {
    pub quality_improvement: f64,
    pub time_efficiency: f64,
    pub success_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DebuggingPerformance {
    pub window_days: u32,
    pub formula: &'static str,
    pub weights: IndexWeights,
    /// Highest index first; models without an index last
    pub models: Vec<IndexBreakdown>,
}
