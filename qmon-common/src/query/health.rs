//! System health classification

use super::views::{HealthStatus, SystemHealth};
use crate::analytics::mean;
use crate::record::AssessmentRecord;

/// Number of most recent records sampled
pub const HEALTH_SAMPLE_SIZE: usize = 50;

pub const DEGRADED_ERROR_RATE: f64 = 0.20;
pub const DEGRADED_MEAN_SCORE: f64 = 60.0;
pub const WARNING_ERROR_RATE: f64 = 0.10;
pub const WARNING_MEAN_SCORE: f64 = 70.0;

pub fn classify(error_rate: f64, mean_score: f64) -> HealthStatus {
    if error_rate > DEGRADED_ERROR_RATE || mean_score < DEGRADED_MEAN_SCORE {
        HealthStatus::Degraded
    } else if error_rate > WARNING_ERROR_RATE || mean_score < WARNING_MEAN_SCORE {
        HealthStatus::Warning
    } else {
        HealthStatus::Excellent
    }
}

/// Health of the most recent records; `records` must be chronological
pub fn system_health(records: &[AssessmentRecord]) -> SystemHealth {
    let sample = &records[records.len().saturating_sub(HEALTH_SAMPLE_SIZE)..];
    if sample.is_empty() {
        return SystemHealth {
            status: HealthStatus::NoData,
            sample_size: 0,
            error_rate: None,
            mean_score: None,
        };
    }

    let failures = sample.iter().filter(|r| !r.success).count();
    let error_rate = failures as f64 / sample.len() as f64;
    let mean_score = mean(sample.iter().map(|r| r.overall_score)).unwrap_or_default();

    SystemHealth {
        status: classify(error_rate, mean_score),
        sample_size: sample.len(),
        error_rate: Some(error_rate),
        mean_score: Some(mean_score),
    }
}
