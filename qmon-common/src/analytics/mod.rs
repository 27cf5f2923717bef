//! Derived analytics over canonical records

pub mod attribution;
pub mod index;
pub mod models;
pub mod timeline;
pub mod trend;
pub mod validation;

use crate::record::AssessmentRecord;
use chrono::{DateTime, Utc};

/// Records with `timestamp >= now - window_days`
pub fn within_window(
    records: &[AssessmentRecord],
    window_days: u32,
    now: DateTime<Utc>,
) -> Vec<&AssessmentRecord> {
    let cutoff = now - chrono::Duration::days(i64::from(window_days));
    records.iter().filter(|r| r.timestamp >= cutoff).collect()
}

/// Arithmetic mean, `None` when empty
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / count as f64)
}
