//! Query façade
//!
//! Read-only operations backing the dashboard views. Each call loads the
//! stores through the cache, normalizes and deduplicates them, and derives
//! its view. Given the same cache contents and clock, every operation returns
//! the same value. Nothing here writes to the stores.

pub mod health;
pub mod labels;
pub mod views;

use crate::analytics::attribution::ModelAttributor;
use crate::analytics::index::{self, breakdown, IndexBreakdown};
use crate::analytics::models::{attribute_and_aggregate, group_by_model, order_models};
use crate::analytics::timeline::{self, DailyModelMatrix};
use crate::analytics::trend::{self, rolling_average};
use crate::analytics::validation::{validate_real_data, ModelSample};
use crate::analytics::{mean, within_window};
use crate::config::DashboardConfig;
use crate::dedupe::dedupe;
use crate::normalize::normalize;
use crate::record::{AssessmentRecord, Attribution};
use crate::store::{StoreLoader, StoreName, StoreSnapshot};
use crate::time::Clock;
use crate::{Error, Result};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tracing::debug;
use views::*;

pub const DEFAULT_TREND_DAYS: i64 = 30;
pub const DEFAULT_TIMELINE_DAYS: i64 = 1;
pub const DEFAULT_TOP_K: i64 = 10;
pub const DEFAULT_ACTIVITY_LIMIT: i64 = 20;

/// Points in the quality-trend rolling average
pub const ROLLING_WINDOW: usize = 5;

pub const MAX_DAYS: i64 = 3650;
pub const MAX_COUNT: i64 = 1000;

const ATTRIBUTION_NOTE: &str = "Records without a model label are attributed by date and time of day. \
     These attributions are approximate and counted separately as inferred.";

pub struct QueryFacade {
    loader: StoreLoader,
    attributor: ModelAttributor,
    clock: Arc<dyn Clock>,
}

impl QueryFacade {
    pub fn new(config: &DashboardConfig, clock: Arc<dyn Clock>) -> Self {
        let loader = StoreLoader::new(&config.data_dir, config.cache_ttl, Arc::clone(&clock));
        Self::from_parts(loader, ModelAttributor::new(config.attribution.clone()), clock)
    }

    pub fn from_parts(loader: StoreLoader, attributor: ModelAttributor, clock: Arc<dyn Clock>) -> Self {
        Self {
            loader,
            attributor,
            clock,
        }
    }

    /// Merged, deduplicated canonical records in chronological order
    pub fn records(&self) -> Vec<AssessmentRecord> {
        self.merge(&self.snapshots())
    }

    fn snapshots(&self) -> Vec<(StoreName, StoreSnapshot)> {
        StoreName::ALL
            .iter()
            .map(|&store| (store, self.loader.load(store)))
            .collect()
    }

    fn merge(&self, snapshots: &[(StoreName, StoreSnapshot)]) -> Vec<AssessmentRecord> {
        let merged: Vec<AssessmentRecord> = snapshots
            .iter()
            .flat_map(|(store, snapshot)| normalize(*store, &snapshot.content, &self.attributor))
            .collect();
        let before = merged.len();
        let records = dedupe(merged);
        debug!("Merged {} records, {} after dedupe", before, records.len());
        records
    }

    pub fn overview(&self) -> Overview {
        let snapshots = self.snapshots();
        let records = self.merge(&snapshots);

        let mut records_by_source = BTreeMap::new();
        for record in &records {
            *records_by_source.entry(record.source).or_insert(0) += 1;
        }

        Overview {
            total_assessments: records.len(),
            average_score: mean(records.iter().map(|r| r.overall_score)),
            success_rate: mean(records.iter().map(|r| if r.success { 1.0 } else { 0.0 })),
            distinct_skills: count_distinct(records.iter().flat_map(|r| r.skills_used.iter().map(String::as_str))),
            distinct_agents: count_distinct(records.iter().flat_map(|r| r.agents_used.iter().map(String::as_str))),
            distinct_task_types: count_distinct(records.iter().map(|r| r.task_type.as_str())),
            distinct_models: count_distinct(records.iter().map(|r| r.model_used.as_str())),
            records_by_source,
            stores_present: snapshots
                .iter()
                .filter(|(_, snapshot)| snapshot.present)
                .map(|(store, _)| store.as_str())
                .collect(),
            last_updated: records.last().map(|r| r.timestamp),
            generated_at: self.clock.now(),
        }
    }

    pub fn quality_trend(&self, days: i64) -> Result<QualityTrendView> {
        let days = validate_days(days)?;
        let trend = trend::trend(&self.records(), days, self.clock.now());
        let scores: Vec<f64> = trend.points.iter().map(|p| p.score).collect();
        Ok(QualityTrendView {
            rolling_average: rolling_average(&scores, ROLLING_WINDOW),
            trend,
        })
    }

    pub fn skill_performance(&self, top_k: i64) -> Result<LabelRanking> {
        let top_k = validate_count("top_k", top_k)?;
        Ok(labels::rank_labels(&self.records(), |r| r.skills_used.as_slice(), top_k))
    }

    pub fn agent_performance(&self, top_k: i64) -> Result<LabelRanking> {
        let top_k = validate_count("top_k", top_k)?;
        Ok(labels::rank_labels(&self.records(), |r| r.agents_used.as_slice(), top_k))
    }

    pub fn task_distribution(&self) -> TaskDistribution {
        let records = self.records();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in &records {
            *counts.entry(record.task_type.as_str()).or_default() += 1;
        }

        let total = records.len();
        let mut task_types: Vec<TaskTypeShare> = counts
            .into_iter()
            .map(|(task_type, count)| TaskTypeShare {
                task_type: task_type.to_string(),
                count,
                percentage: count as f64 / total as f64 * 100.0,
            })
            .collect();
        // BTreeMap order already sorts names; stable sort keeps it for ties
        task_types.sort_by(|a, b| b.count.cmp(&a.count));

        TaskDistribution { total, task_types }
    }

    pub fn recent_activity(&self, limit: i64) -> Result<Vec<ActivityEntry>> {
        let limit = validate_count("limit", limit)?;
        Ok(self
            .records()
            .into_iter()
            .rev()
            .take(limit)
            .map(|r| ActivityEntry {
                timestamp: r.timestamp,
                task_type: r.task_type,
                overall_score: r.overall_score,
                success: r.success,
                model_used: r.model_used,
                attribution: r.attribution,
                source: r.source,
                skills_used: r.skills_used,
                agents_used: r.agents_used,
            })
            .collect())
    }

    pub fn system_health(&self) -> SystemHealth {
        health::system_health(&self.records())
    }

    pub fn model_quality_scores(&self) -> ModelQualityScores {
        let records = self.records();
        let mut stats = attribute_and_aggregate(&records);
        let order = order_models(stats.keys().map(String::as_str));

        ModelQualityScores {
            models: order.iter().filter_map(|name| stats.remove(name)).collect(),
            total_records: records.len(),
            inferred_records: records
                .iter()
                .filter(|r| r.attribution == Attribution::Inferred)
                .count(),
            attribution_note: ATTRIBUTION_NOTE,
        }
    }

    pub fn timeline(&self, days: i64) -> Result<DailyModelMatrix> {
        let days = validate_days(days)?;
        Ok(timeline::timeline(&self.records(), days, self.clock.now()))
    }

    pub fn debugging_performance_index(&self, days: i64) -> Result<DebuggingPerformance> {
        let days = validate_days(days)?;
        let records = self.records();
        let window = within_window(&records, days, self.clock.now());

        let mut models: Vec<IndexBreakdown> = group_by_model(window)
            .into_iter()
            .filter(|(model, group)| match validate_real_data(&ModelSample::from_records(group)) {
                Ok(()) => true,
                Err(reason) => {
                    debug!("No index for {}: {}", model, reason);
                    false
                }
            })
            .map(|(model, group)| breakdown(&model, &group))
            .collect();

        models.sort_by(|a, b| match (a.performance_index, b.performance_index) {
            (Some(x), Some(y)) => y.total_cmp(&x).then_with(|| a.model.cmp(&b.model)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.model.cmp(&b.model),
        });

        Ok(DebuggingPerformance {
            window_days: days,
            formula: index::FORMULA,
            weights: IndexWeights {
                quality_improvement: index::QUALITY_WEIGHT,
                time_efficiency: index::TIME_WEIGHT,
                success_rate: index::SUCCESS_WEIGHT,
            },
            models,
        })
    }
}

fn count_distinct<'a, I>(labels: I) -> usize
where
    I: IntoIterator<Item = &'a str>,
{
    labels.into_iter().collect::<HashSet<_>>().len()
}

/// `days` must lie in `1..=MAX_DAYS`
pub fn validate_days(days: i64) -> Result<u32> {
    if !(1..=MAX_DAYS).contains(&days) {
        return Err(Error::InvalidInput(format!(
            "days must be between 1 and {}, got {}",
            MAX_DAYS, days
        )));
    }
    u32::try_from(days).map_err(|_| Error::InvalidInput(format!("days out of range: {}", days)))
}

/// Counts such as `top_k` and `limit` must lie in `1..=MAX_COUNT`
pub fn validate_count(name: &str, value: i64) -> Result<usize> {
    if !(1..=MAX_COUNT).contains(&value) {
        return Err(Error::InvalidInput(format!(
            "{} must be between 1 and {}, got {}",
            name, MAX_COUNT, value
        )));
    }
    usize::try_from(value).map_err(|_| Error::InvalidInput(format!("{} out of range: {}", name, value)))
}
