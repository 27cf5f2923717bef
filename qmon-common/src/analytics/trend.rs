//! Trend & velocity analysis
//!
//! Split-half comparison: the chronologically sorted window is cut at its
//! midpoint and the mean of the second half is compared against the first.

use super::{mean, within_window};
use crate::record::AssessmentRecord;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Fewest points for which a trend is reported
pub const MIN_TREND_POINTS: usize = 3;

/// Half-mean delta beyond which movement is "fast"
pub const TREND_THRESHOLD: f64 = 3.0;

/// Label format for chart points
pub const POINT_LABEL_FORMAT: &str = "%m/%d %H:%M";

/// Discrete score movement between the halves of a window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendClass {
    /// delta > 3
    Accelerating,
    /// 0 < delta <= 3
    Improving,
    /// -3 < delta <= 0
    Stable,
    /// delta <= -3
    Declining,
    /// Fewer than [`MIN_TREND_POINTS`] points
    InsufficientData,
}

impl TrendClass {
    pub fn from_delta(delta: f64) -> Self {
        if delta > TREND_THRESHOLD {
            Self::Accelerating
        } else if delta > 0.0 {
            Self::Improving
        } else if delta > -TREND_THRESHOLD {
            Self::Stable
        } else {
            Self::Declining
        }
    }
}

/// Means of both halves of a score sequence
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitHalf {
    pub first_half_mean: f64,
    pub second_half_mean: f64,
    pub delta: f64,
}

/// Split at `len / 2`; `None` below [`MIN_TREND_POINTS`]
pub fn split_half(scores: &[f64]) -> Option<SplitHalf> {
    if scores.len() < MIN_TREND_POINTS {
        return None;
    }
    let (first, second) = scores.split_at(scores.len() / 2);
    let first_half_mean = mean(first.iter().copied())?;
    let second_half_mean = mean(second.iter().copied())?;
    Some(SplitHalf {
        first_half_mean,
        second_half_mean,
        delta: second_half_mean - first_half_mean,
    })
}

/// Trend of a bare, already-ordered score sequence
pub fn classify_scores(scores: &[f64]) -> TrendClass {
    split_half(scores)
        .map(|split| TrendClass::from_delta(split.delta))
        .unwrap_or(TrendClass::InsufficientData)
}

/// Trailing moving average; the first points average what is available
pub fn rolling_average(scores: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..scores.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let slice = &scores[start..=i];
            slice.iter().sum::<f64>() / slice.len() as f64
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub timestamp: DateTime<Utc>,
    pub label: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendResult {
    pub window_days: u32,
    pub trend: TrendClass,
    pub points: Vec<TrendPoint>,
    pub overall_mean: Option<f64>,
    pub first_half_mean: Option<f64>,
    pub second_half_mean: Option<f64>,
    pub delta: Option<f64>,
}

/// Trend over the trailing `window_days`
pub fn trend(records: &[AssessmentRecord], window_days: u32, now: DateTime<Utc>) -> TrendResult {
    let mut window = within_window(records, window_days, now);
    window.sort_by_key(|r| r.timestamp);

    let scores: Vec<f64> = window.iter().map(|r| r.overall_score).collect();
    let split = split_half(&scores);

    TrendResult {
        window_days,
        trend: split
            .map(|s| TrendClass::from_delta(s.delta))
            .unwrap_or(TrendClass::InsufficientData),
        points: window
            .iter()
            .map(|r| TrendPoint {
                timestamp: r.timestamp,
                label: r.timestamp.format(POINT_LABEL_FORMAT).to_string(),
                score: r.overall_score,
            })
            .collect(),
        overall_mean: mean(scores.iter().copied()),
        first_half_mean: split.map(|s| s.first_half_mean),
        second_half_mean: split.map(|s| s.second_half_mean),
        delta: split.map(|s| s.delta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::{at_hour, record};

    #[test]
    fn test_equal_halves_accelerating() {
        let scores = [70.0, 70.0, 70.0, 90.0, 90.0, 90.0];
        let split = split_half(&scores).unwrap();
        assert_eq!(split.first_half_mean, 70.0);
        assert_eq!(split.second_half_mean, 90.0);
        assert_eq!(split.delta, 20.0);
        assert_eq!(classify_scores(&scores), TrendClass::Accelerating);
    }

    #[test]
    fn test_threshold_boundaries() {
        assert_eq!(TrendClass::from_delta(3.0001), TrendClass::Accelerating);
        assert_eq!(TrendClass::from_delta(3.0), TrendClass::Improving);
        assert_eq!(TrendClass::from_delta(0.5), TrendClass::Improving);
        assert_eq!(TrendClass::from_delta(0.0), TrendClass::Stable);
        assert_eq!(TrendClass::from_delta(-2.9), TrendClass::Stable);
        assert_eq!(TrendClass::from_delta(-3.0), TrendClass::Declining);
        assert_eq!(TrendClass::from_delta(-20.0), TrendClass::Declining);
    }

    #[test]
    fn test_odd_length_second_half_is_larger() {
        // [80] vs [70, 72]
        let split = split_half(&[80.0, 70.0, 72.0]).unwrap();
        assert_eq!(split.first_half_mean, 80.0);
        assert_eq!(split.second_half_mean, 71.0);
        assert_eq!(classify_scores(&[80.0, 70.0, 72.0]), TrendClass::Declining);
    }

    #[test]
    fn test_fewer_than_three_points_is_insufficient() {
        assert_eq!(classify_scores(&[]), TrendClass::InsufficientData);
        assert_eq!(classify_scores(&[50.0, 99.0]), TrendClass::InsufficientData);

        let records = vec![record(at_hour(1), 60.0), record(at_hour(2), 90.0)];
        let result = trend(&records, 30, at_hour(3));
        assert_eq!(result.trend, TrendClass::InsufficientData);
        assert!(result.delta.is_none());
        assert!(result.first_half_mean.is_none());
        assert_eq!(result.points.len(), 2);
        assert_eq!(result.overall_mean, Some(75.0));
    }

    #[test]
    fn test_trend_filters_window_and_sorts() {
        let records = vec![
            record(at_hour(100), 90.0),
            record(at_hour(0), 10.0), // outside 2-day window
            record(at_hour(90), 70.0),
            record(at_hour(95), 72.0),
        ];
        let result = trend(&records, 2, at_hour(101));

        assert_eq!(result.points.len(), 3);
        let scores: Vec<_> = result.points.iter().map(|p| p.score).collect();
        assert_eq!(scores, vec![70.0, 72.0, 90.0]);
        assert_eq!(result.trend, TrendClass::Accelerating);
        assert_eq!(result.points[0].label, "11/13 18:00");
    }

    #[test]
    fn test_empty_window() {
        let result = trend(&[], 30, at_hour(0));
        assert_eq!(result.trend, TrendClass::InsufficientData);
        assert!(result.points.is_empty());
        assert!(result.overall_mean.is_none());
    }

    #[test]
    fn test_rolling_average() {
        let avg = rolling_average(&[10.0, 20.0, 30.0, 40.0], 2);
        assert_eq!(avg, vec![10.0, 15.0, 25.0, 35.0]);
        assert!(rolling_average(&[], 5).is_empty());
    }
}
