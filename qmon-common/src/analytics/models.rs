//! Per-model performance aggregation
//!
//! Records arrive already attributed (see [`super::attribution`]). Each
//! model's sample goes through [`validate_real_data`] before its aggregate is
//! published; models that fail are omitted.

use super::mean;
use super::trend::{classify_scores, TrendClass};
use super::validation::{validate_real_data, ModelSample};
use crate::record::{AssessmentRecord, Attribution, UNKNOWN_MODEL};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::debug;

/// Models listed first, in this order, wherever models are enumerated
pub const KNOWN_MODELS: [&str; 3] = ["Claude Sonnet 4.5", "Claude Opus 4.1", "GLM 4.6"];

/// Number of most recent scores reported per model
pub const RECENT_SCORES: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelStats {
    pub model: String,
    pub mean_score: f64,
    /// Last [`RECENT_SCORES`] scores, oldest first
    pub recent_scores: Vec<f64>,
    pub trend: TrendClass,
    pub task_count: usize,
    /// Fraction in [0, 1]
    pub success_rate: f64,
    pub first_seen: DateTime<Utc>,
    pub last_seen: DateTime<Utc>,
    /// Records whose model label came from the store
    pub explicit_count: usize,
    /// Records attributed by the date/time heuristic
    pub inferred_count: usize,
}

/// Group records by attributed model, each group in chronological order
pub fn group_by_model<'a, I>(records: I) -> BTreeMap<String, Vec<&'a AssessmentRecord>>
where
    I: IntoIterator<Item = &'a AssessmentRecord>,
{
    let mut groups: BTreeMap<String, Vec<&AssessmentRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.model_used.clone()).or_default().push(record);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|r| r.timestamp);
    }
    groups
}

/// Validated per-model statistics
pub fn attribute_and_aggregate(records: &[AssessmentRecord]) -> BTreeMap<String, ModelStats> {
    group_by_model(records)
        .into_iter()
        .filter_map(|(model, group)| aggregate_model(&model, &group).map(|stats| (model, stats)))
        .collect()
}

/// Aggregate one model's chronologically ordered records, if they pass validation
pub fn aggregate_model(model: &str, records: &[&AssessmentRecord]) -> Option<ModelStats> {
    let sample = ModelSample::from_records(records);
    if let Err(reason) = validate_real_data(&sample) {
        debug!("Omitting model {}: {}", model, reason);
        return None;
    }

    let first = records.first()?;
    let last = records.last()?;
    let recent_start = sample.scores.len().saturating_sub(RECENT_SCORES);

    Some(ModelStats {
        model: model.to_string(),
        mean_score: mean(sample.scores.iter().copied())?,
        recent_scores: sample.scores[recent_start..].to_vec(),
        trend: classify_scores(&sample.scores),
        task_count: records.len(),
        success_rate: sample.success_rate,
        first_seen: first.timestamp,
        last_seen: last.timestamp,
        explicit_count: count_attribution(records, Attribution::Explicit),
        inferred_count: count_attribution(records, Attribution::Inferred),
    })
}

pub(crate) fn count_attribution(records: &[&AssessmentRecord], kind: Attribution) -> usize {
    records.iter().filter(|r| r.attribution == kind).count()
}

/// Known models first (fixed order), then others alphabetically, `Unknown` last
pub fn order_models<'a, I>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut others: Vec<&str> = Vec::new();
    let mut known_seen = [false; KNOWN_MODELS.len()];
    let mut unknown_seen = false;

    for name in names {
        if let Some(pos) = KNOWN_MODELS.iter().position(|k| *k == name) {
            known_seen[pos] = true;
        } else if name == UNKNOWN_MODEL {
            unknown_seen = true;
        } else if !others.contains(&name) {
            others.push(name);
        }
    }
    others.sort_unstable();

    KNOWN_MODELS
        .iter()
        .zip(known_seen)
        .filter(|(_, seen)| *seen)
        .map(|(name, _)| *name)
        .chain(others)
        .chain(unknown_seen.then_some(UNKNOWN_MODEL))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::{at_hour, record};

    fn model_record(model: &str, hour: i64, score: f64) -> AssessmentRecord {
        let mut rec = record(at_hour(hour), score);
        rec.model_used = model.to_string();
        rec
    }

    #[test]
    fn test_constant_model_is_excluded() {
        let records = vec![
            model_record("Flat", 1, 85.0),
            model_record("Flat", 2, 85.0),
            model_record("Flat", 3, 85.0),
            model_record("GLM 4.6", 1, 70.0),
            model_record("GLM 4.6", 2, 80.0),
        ];
        let stats = attribute_and_aggregate(&records);
        assert!(!stats.contains_key("Flat"));
        assert!(stats.contains_key("GLM 4.6"));
    }

    #[test]
    fn test_aggregate_values() {
        let mut records: Vec<_> = (0..12)
            .map(|h| model_record("GLM 4.6", h, 60.0 + h as f64 * 2.0))
            .collect();
        records[0].attribution = Attribution::Inferred;
        records[11].success = false;

        let stats = &attribute_and_aggregate(&records)["GLM 4.6"];
        assert_eq!(stats.task_count, 12);
        assert_eq!(stats.recent_scores.len(), RECENT_SCORES);
        assert_eq!(stats.recent_scores[0], 64.0);
        assert_eq!(stats.recent_scores[9], 82.0);
        assert_eq!(stats.mean_score, 71.0);
        assert_eq!(stats.trend, TrendClass::Accelerating);
        assert_eq!(stats.inferred_count, 1);
        assert_eq!(stats.explicit_count, 11);
        assert_eq!(stats.first_seen, at_hour(0));
        assert_eq!(stats.last_seen, at_hour(11));
        // 60..68 are below the pass threshold and the last record failed
        assert_eq!(stats.success_rate, 0.5);
    }

    #[test]
    fn test_two_record_model_has_insufficient_trend() {
        let records = vec![model_record("X", 1, 60.0), model_record("X", 2, 90.0)];
        let stats = &attribute_and_aggregate(&records)["X"];
        assert_eq!(stats.trend, TrendClass::InsufficientData);
    }

    #[test]
    fn test_order_models() {
        let ordered = order_models(["Zeta", "Unknown", "GLM 4.6", "Alpha", "Claude Sonnet 4.5", "Alpha"]);
        assert_eq!(ordered, vec!["Claude Sonnet 4.5", "GLM 4.6", "Alpha", "Zeta", "Unknown"]);
        assert!(order_models(std::iter::empty()).is_empty());
    }

    #[test]
    fn test_empty_records_yield_no_models() {
        assert!(attribute_and_aggregate(&[]).is_empty());
    }
}
