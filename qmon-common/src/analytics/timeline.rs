//! Day × model timeline for grouped/stacked charts

use super::models::{count_attribution, order_models};
use super::{mean, within_window};
use crate::record::{AssessmentRecord, Attribution};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelCell {
    pub mean_score: f64,
    pub count: usize,
    /// Records whose model was inferred rather than reported
    pub inferred_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayBucket {
    pub date: NaiveDate,
    /// Short chart label, `MM/DD`
    pub label: String,
    pub total_assessments: usize,
    pub task_types: Vec<String>,
    pub models: BTreeMap<String, ModelCell>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyModelMatrix {
    pub window_days: u32,
    /// Series order for the chart legend
    pub models: Vec<String>,
    /// Ascending by date
    pub days: Vec<DayBucket>,
}

/// Group records in the window by UTC day, then by model
pub fn timeline(records: &[AssessmentRecord], window_days: u32, now: DateTime<Utc>) -> DailyModelMatrix {
    let mut by_day: BTreeMap<NaiveDate, Vec<&AssessmentRecord>> = BTreeMap::new();
    for record in within_window(records, window_days, now) {
        by_day.entry(record.timestamp.date_naive()).or_default().push(record);
    }

    let models = order_models(
        by_day
            .values()
            .flatten()
            .map(|r| r.model_used.as_str()),
    );

    let days = by_day
        .into_iter()
        .map(|(date, day_records)| day_bucket(date, &day_records))
        .collect();

    DailyModelMatrix {
        window_days,
        models,
        days,
    }
}

fn day_bucket(date: NaiveDate, records: &[&AssessmentRecord]) -> DayBucket {
    let mut by_model: BTreeMap<&str, Vec<&AssessmentRecord>> = BTreeMap::new();
    let mut task_types: BTreeSet<&str> = BTreeSet::new();

    for &record in records {
        by_model.entry(record.model_used.as_str()).or_default().push(record);
        task_types.insert(record.task_type.as_str());
    }

    let models = by_model
        .into_iter()
        .filter_map(|(model, model_records)| {
            let cell = ModelCell {
                mean_score: mean(model_records.iter().map(|r| r.overall_score))?,
                count: model_records.len(),
                inferred_count: count_attribution(&model_records, Attribution::Inferred),
            };
            Some((model.to_string(), cell))
        })
        .collect();

    DayBucket {
        date,
        label: date.format("%m/%d").to_string(),
        total_assessments: records.len(),
        task_types: task_types.into_iter().map(str::to_string).collect(),
        models,
    }
}
