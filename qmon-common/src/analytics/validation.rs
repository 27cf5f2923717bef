//! Real-data validation
//!
//! Per-model aggregates are only published when the underlying sample looks
//! like real measurements. A sample that fails any check is reported as
//! [`NoRealData`] and the model is left out of the output; nothing is ever
//! substituted for it.

use crate::record::AssessmentRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

/// Smallest max-min score spread accepted as real variation
pub const MIN_SCORE_RANGE: f64 = 2.0;

/// Minimal statistics the validator looks at
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSample {
    pub scores: Vec<f64>,
    pub timestamps: Vec<DateTime<Utc>>,
    pub task_count: i64,
    pub success_rate: f64,
}

impl ModelSample {
    pub fn from_records(records: &[&AssessmentRecord]) -> Self {
        let successes = records.iter().filter(|r| r.success).count();
        let success_rate = if records.is_empty() {
            0.0
        } else {
            successes as f64 / records.len() as f64
        };

        Self {
            scores: records.iter().map(|r| r.overall_score).collect(),
            timestamps: records.iter().map(|r| r.timestamp).collect(),
            task_count: records.len() as i64,
            success_rate,
        }
    }
}

/// Why a model's data was judged degenerate
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum NoRealData {
    #[error("no tasks recorded")]
    NoTasks,
    #[error("success rate {rate} outside [0, 1]")]
    SuccessRateOutOfBounds { rate: f64 },
    #[error("all scores identical")]
    ZeroVariance,
    #[error("score range {range:.2} below minimum")]
    NarrowRange { range: f64 },
    #[error("all timestamps identical")]
    IdenticalTimestamps,
}

/// Reject samples that look synthetic or carry no information
pub fn validate_real_data(sample: &ModelSample) -> Result<(), NoRealData> {
    if sample.task_count <= 0 || sample.scores.is_empty() {
        return Err(NoRealData::NoTasks);
    }

    if !(0.0..=1.0).contains(&sample.success_rate) || !sample.success_rate.is_finite() {
        return Err(NoRealData::SuccessRateOutOfBounds {
            rate: sample.success_rate,
        });
    }

    let (min, max) = sample
        .scores
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &s| (lo.min(s), hi.max(s)));
    if max == min {
        return Err(NoRealData::ZeroVariance);
    }
    if max - min < MIN_SCORE_RANGE {
        return Err(NoRealData::NarrowRange { range: max - min });
    }

    if let Some(first) = sample.timestamps.first() {
        if sample.timestamps.iter().all(|t| t == first) {
            return Err(NoRealData::IdenticalTimestamps);
        }
    }

    Ok(())
}
