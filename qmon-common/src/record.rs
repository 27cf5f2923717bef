//! Canonical assessment record
//!
//! Every store is normalized into [`AssessmentRecord`]. Records are derived
//! per query from cached raw store content and never written back.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Sentinel model name for records that cannot be attributed
pub const UNKNOWN_MODEL: &str = "Unknown";

/// Score at or above which a record without an explicit outcome counts as a pass
pub const PASS_THRESHOLD: f64 = 70.0;

/// Provenance tag: which raw store produced a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    QualityHistory,
    PerformanceRecords,
    Patterns,
    Assessments,
    Trends,
    ModelPerformance,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QualityHistory => "quality_history",
            Self::PerformanceRecords => "performance_records",
            Self::Patterns => "patterns",
            Self::Assessments => "assessments",
            Self::Trends => "trends",
            Self::ModelPerformance => "model_performance",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How `model_used` was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribution {
    /// Model label came from the store itself
    Explicit,
    /// Best-effort guess from the record's date and time of day
    Inferred,
    /// No label and no heuristic match; model is [`UNKNOWN_MODEL`]
    Unattributed,
}

/// Deduplication key
///
/// Scores are compared at millipoint precision so that the same float
/// written by two writers maps to the same key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum IdentityKey {
    Explicit(String),
    Composite {
        timestamp: DateTime<Utc>,
        score_millis: i64,
        task_type: String,
    },
}

/// One task assessment in store-agnostic form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentRecord {
    pub assessment_id: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub task_type: String,
    pub model_used: String,
    pub attribution: Attribution,
    /// Quality score in [0, 100]
    pub overall_score: f64,
    pub success: bool,
    pub skills_used: Vec<String>,
    pub agents_used: Vec<String>,
    /// Elapsed seconds; 0 when the store did not report it
    pub duration: f64,
    pub source: Source,
    pub auto_generated: bool,
}

impl AssessmentRecord {
    /// Explicit assessment id when present, else (timestamp, score, task type)
    pub fn identity_key(&self) -> IdentityKey {
        match &self.assessment_id {
            Some(id) => IdentityKey::Explicit(id.clone()),
            None => IdentityKey::Composite {
                timestamp: self.timestamp,
                score_millis: (self.overall_score * 1000.0).round() as i64,
                task_type: self.task_type.clone(),
            },
        }
    }

    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }
}
