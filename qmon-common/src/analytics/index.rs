//! Composite debugging performance index
//!
//! `index = 0.40 × QualityImprovement + 0.35 × TimeEfficiency
//!        + 0.25 × SuccessRate − RegressionPenalty`
//!
//! All inputs are on a 0-100 scale. A task lineage is the run of a model's
//! records sharing a task type, in chronological order. Every input is
//! reported next to the result so the breakdown can be shown with it.

use super::mean;
use super::models::count_attribution;
use crate::record::{AssessmentRecord, Attribution};
use serde::Serialize;
use std::collections::BTreeMap;

pub const QUALITY_WEIGHT: f64 = 0.40;
pub const TIME_WEIGHT: f64 = 0.35;
pub const SUCCESS_WEIGHT: f64 = 0.25;

/// Mean duration at or below which time efficiency is 100
pub const TARGET_RESOLUTION_SECS: f64 = 60.0;

/// Penalty points per score point lost between consecutive observations
pub const REGRESSION_WEIGHT: f64 = 0.5;
pub const MAX_REGRESSION_PENALTY: f64 = 25.0;

pub const FORMULA: &str =
    "0.40 × QualityImprovementScore + 0.35 × TimeEfficiencyScore + 0.25 × SuccessRate − RegressionPenalty";

/// Weighted composite, clamped to [0, 100]
pub fn performance_index(
    quality_improvement: f64,
    time_efficiency: f64,
    success_rate: f64,
    regression_penalty: f64,
) -> f64 {
    let raw = QUALITY_WEIGHT * quality_improvement
        + TIME_WEIGHT * time_efficiency
        + SUCCESS_WEIGHT * success_rate
        - regression_penalty;
    raw.clamp(0.0, 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexBreakdown {
    pub model: String,
    pub task_count: usize,
    /// Records whose model was inferred rather than reported
    pub inferred_count: usize,
    pub quality_improvement_score: Option<f64>,
    pub time_efficiency_score: Option<f64>,
    /// Percentage of successful records
    pub success_rate: Option<f64>,
    pub regression_penalty: f64,
    pub performance_index: Option<f64>,
    /// Inputs that could not be computed from the data
    pub missing_inputs: Vec<&'static str>,
}

/// Index inputs and result for one model's chronologically ordered records
pub fn breakdown(model: &str, records: &[&AssessmentRecord]) -> IndexBreakdown {
    let lineages = lineages(records);

    let quality_improvement_score = quality_improvement(&lineages);
    let time_efficiency_score = time_efficiency(records);
    let success_rate = (!records.is_empty())
        .then(|| records.iter().filter(|r| r.success).count() as f64 / records.len() as f64 * 100.0);
    let regression_penalty = regression_penalty(&lineages);

    let mut missing_inputs = Vec::new();
    if quality_improvement_score.is_none() {
        missing_inputs.push("quality_improvement_score");
    }
    if time_efficiency_score.is_none() {
        missing_inputs.push("time_efficiency_score");
    }
    if success_rate.is_none() {
        missing_inputs.push("success_rate");
    }

    let performance_index = match (quality_improvement_score, time_efficiency_score, success_rate) {
        (Some(q), Some(t), Some(s)) => Some(performance_index(q, t, s, regression_penalty)),
        _ => None,
    };

    IndexBreakdown {
        model: model.to_string(),
        task_count: records.len(),
        inferred_count: count_attribution(records, Attribution::Inferred),
        quality_improvement_score,
        time_efficiency_score,
        success_rate,
        regression_penalty,
        performance_index,
        missing_inputs,
    }
}

/// Scores per task type, in record order
fn lineages<'a>(records: &[&'a AssessmentRecord]) -> BTreeMap<&'a str, Vec<f64>> {
    let mut by_task: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for &record in records {
        by_task
            .entry(record.task_type.as_str())
            .or_default()
            .push(record.overall_score);
    }
    by_task
}

/// Half final quality, half share of the improvement gap closed
fn quality_improvement(lineages: &BTreeMap<&str, Vec<f64>>) -> Option<f64> {
    let finals = mean(lineages.values().filter_map(|s| s.last().copied()))?;
    let gap_closed = mean(lineages.values().filter_map(|scores| {
        let first = *scores.first()?;
        let last = *scores.last()?;
        Some(gap_closed_pct(first, last))
    }))?;
    Some(0.5 * finals + 0.5 * gap_closed)
}

/// Percentage of the distance to 100 covered between first and last score
pub fn gap_closed_pct(first: f64, last: f64) -> f64 {
    let gap = 100.0 - first;
    if gap <= 0.0 {
        return 100.0;
    }
    ((last - first).max(0.0) / gap * 100.0).min(100.0)
}

fn time_efficiency(records: &[&AssessmentRecord]) -> Option<f64> {
    let mean_duration = mean(
        records
            .iter()
            .filter(|r| r.has_duration())
            .map(|r| r.duration),
    )?;
    Some(100.0 * (TARGET_RESOLUTION_SECS / mean_duration).min(1.0))
}

fn regression_penalty(lineages: &BTreeMap<&str, Vec<f64>>) -> f64 {
    let total_drop: f64 = lineages
        .values()
        .flat_map(|scores| scores.windows(2))
        .map(|pair| (pair[0] - pair[1]).max(0.0))
        .sum();
    (REGRESSION_WEIGHT * total_drop).min(MAX_REGRESSION_PENALTY)
}
