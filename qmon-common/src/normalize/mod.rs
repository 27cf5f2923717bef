//! Record normalizer
//!
//! Each store has its own layout. A per-store decoder maps every raw entry
//! to a [`Decoded`] outcome: either a canonical record or an explicit skip
//! with the reason. Malformed entries are skipped one at a time; a bad entry
//! never discards the rest of its store.

mod fields;
mod stores;

use crate::analytics::attribution::ModelAttributor;
use crate::record::{AssessmentRecord, Source, PASS_THRESHOLD};
use crate::store::StoreName;
use crate::time::parse_timestamp;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::debug;

/// Why an entry was left out
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotAnObject,
    MissingTimestamp,
    InvalidTimestamp,
    MissingScore,
    ScoreOutOfRange,
    NegativeDuration,
}

/// Outcome of decoding one raw store entry
#[derive(Debug, Clone, PartialEq)]
pub enum Decoded {
    Record(Box<AssessmentRecord>),
    Skip(SkipReason),
}

/// Decode every entry of a store, keeping skip outcomes
pub fn decode_store(store: StoreName, content: &Value, attributor: &ModelAttributor) -> Vec<Decoded> {
    let drafts = match store {
        StoreName::QualityHistory => stores::quality_history(content),
        StoreName::PerformanceRecords => stores::performance_records(content),
        StoreName::Patterns => stores::patterns(content),
        StoreName::Assessments => stores::assessments(content),
        StoreName::Trends => stores::trends(content),
        StoreName::ModelPerformance => stores::model_performance(content),
    };

    drafts
        .into_iter()
        .map(|draft| match draft {
            Ok(draft) => draft.finish(store.source(), attributor),
            Err(reason) => Decoded::Skip(reason),
        })
        .collect()
}

/// Canonical records from one store; skips are counted and logged
pub fn normalize(store: StoreName, content: &Value, attributor: &ModelAttributor) -> Vec<AssessmentRecord> {
    let mut skipped: BTreeMap<SkipReason, usize> = BTreeMap::new();
    let mut records = Vec::new();

    for decoded in decode_store(store, content, attributor) {
        match decoded {
            Decoded::Record(record) => records.push(*record),
            Decoded::Skip(reason) => *skipped.entry(reason).or_default() += 1,
        }
    }

    if !skipped.is_empty() {
        debug!(
            "Store {}: kept {} records, skipped {:?}",
            store.as_str(),
            records.len(),
            skipped
        );
    }

    records
}

/// Fields pulled out of one raw entry, before validation
#[derive(Debug, Default)]
pub(crate) struct Draft<'a> {
    pub assessment_id: Option<String>,
    pub timestamp: Option<&'a Value>,
    pub task_type: Option<String>,
    pub model: Option<String>,
    pub score: Option<&'a Value>,
    pub success: Option<bool>,
    pub skills_used: Vec<String>,
    pub agents_used: Vec<String>,
    pub duration: Option<&'a Value>,
    pub auto_generated: bool,
}

impl Draft<'_> {
    /// Validate required fields and build the canonical record
    fn finish(self, source: Source, attributor: &ModelAttributor) -> Decoded {
        let timestamp = match self.timestamp.filter(|v| !v.is_null()) {
            None => return Decoded::Skip(SkipReason::MissingTimestamp),
            Some(raw) => match parse_timestamp(raw) {
                Some(ts) => ts,
                None => return Decoded::Skip(SkipReason::InvalidTimestamp),
            },
        };

        let overall_score = match self.score.and_then(fields::number) {
            None => return Decoded::Skip(SkipReason::MissingScore),
            Some(score) if !score.is_finite() || !(0.0..=100.0).contains(&score) => {
                return Decoded::Skip(SkipReason::ScoreOutOfRange)
            }
            Some(score) => score,
        };

        let duration = match self.duration.and_then(fields::number) {
            Some(d) if d < 0.0 || !d.is_finite() => return Decoded::Skip(SkipReason::NegativeDuration),
            Some(d) => d,
            None => 0.0,
        };

        let (model_used, attribution) = attributor.attribute(self.model.as_deref(), timestamp);

        Decoded::Record(Box::new(AssessmentRecord {
            assessment_id: self.assessment_id,
            timestamp,
            task_type: self.task_type.unwrap_or_else(|| "unknown".to_string()),
            model_used,
            attribution,
            overall_score,
            success: self.success.unwrap_or(overall_score >= PASS_THRESHOLD),
            skills_used: self.skills_used,
            agents_used: self.agents_used,
            duration,
            source,
            auto_generated: self.auto_generated,
        }))
    }
}
