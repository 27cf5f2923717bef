//! Model attribution
//!
//! Explicit labels from the stores always win. Records without one get a
//! best-effort guess from their date and time of day (see
//! [`AttributionConfig`]); the guess is tagged [`Attribution::Inferred`] so it
//! can never be mistaken for a verified label.

use crate::config::AttributionConfig;
use crate::record::{Attribution, UNKNOWN_MODEL};
use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};

#[derive(Debug, Clone)]
pub struct ModelAttributor {
    config: AttributionConfig,
}

impl Default for ModelAttributor {
    fn default() -> Self {
        Self::new(AttributionConfig::default())
    }
}

impl ModelAttributor {
    pub fn new(config: AttributionConfig) -> Self {
        Self { config }
    }

    /// Resolve the model for a record
    ///
    /// Blank labels and the literal `Unknown` count as absent.
    pub fn attribute(&self, explicit: Option<&str>, timestamp: DateTime<Utc>) -> (String, Attribution) {
        if let Some(label) = explicit.map(str::trim).filter(|l| is_real_label(l)) {
            return (label.to_string(), Attribution::Explicit);
        }

        match self.infer(timestamp) {
            Some(model) => (model.to_string(), Attribution::Inferred),
            None => (UNKNOWN_MODEL.to_string(), Attribution::Unattributed),
        }
    }

    fn infer(&self, timestamp: DateTime<Utc>) -> Option<&str> {
        let cfg = &self.config;
        if timestamp.date_naive() < cfg.cutover {
            return Some(cfg.legacy_model.as_str());
        }

        let hour = timestamp.hour();
        let in_hours = hour >= cfg.business_start_hour && hour < cfg.business_end_hour;
        let weekday_ok = !cfg.weekdays_only
            || !matches!(timestamp.weekday(), Weekday::Sat | Weekday::Sun);

        (in_hours && weekday_ok).then_some(cfg.current_model.as_str())
    }
}

fn is_real_label(label: &str) -> bool {
    !label.is_empty() && !label.eq_ignore_ascii_case(UNKNOWN_MODEL)
}
