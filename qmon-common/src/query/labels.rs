//! Skill and agent rankings

use super::views::{LabelPerformance, LabelRanking};
use crate::record::AssessmentRecord;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

#[derive(Default)]
struct Tally {
    uses: usize,
    successes: usize,
    score_sum: f64,
    last_used: Option<DateTime<Utc>>,
}

/// Rank labels by usage (desc, then name); each record counts once per label
pub fn rank_labels<F>(records: &[AssessmentRecord], labels_of: F, top_k: usize) -> LabelRanking
where
    F: Fn(&AssessmentRecord) -> &[String],
{
    let mut tallies: HashMap<&str, Tally> = HashMap::new();

    for record in records {
        let mut labels: Vec<&str> = labels_of(record).iter().map(String::as_str).collect();
        labels.sort_unstable();
        labels.dedup();

        for label in labels {
            let tally = tallies.entry(label).or_default();
            tally.uses += 1;
            tally.successes += usize::from(record.success);
            tally.score_sum += record.overall_score;
            tally.last_used = tally.last_used.max(Some(record.timestamp));
        }
    }

    let total = tallies.len();
    let mut items: Vec<LabelPerformance> = tallies
        .into_iter()
        .filter_map(|(name, tally)| {
            Some(LabelPerformance {
                name: name.to_string(),
                usage_count: tally.uses,
                success_rate: tally.successes as f64 / tally.uses as f64,
                mean_score: tally.score_sum / tally.uses as f64,
                last_used: tally.last_used?,
            })
        })
        .collect();

    items.sort_by(|a, b| b.usage_count.cmp(&a.usage_count).then_with(|| a.name.cmp(&b.name)));
    items.truncate(top_k);

    LabelRanking { total, items }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::fixtures::{at_hour, record};

    fn with_skills(hour: i64, score: f64, skills: &[&str]) -> AssessmentRecord {
        let mut r = record(at_hour(hour), score);
        r.skills_used = skills.iter().map(|s| s.to_string()).collect();
        r
    }

    #[test]
    fn test_ranking_order_and_stats() {
        let records = vec![
            with_skills(1, 90.0, &["testing", "analysis"]),
            with_skills(2, 50.0, &["analysis"]),
            with_skills(3, 80.0, &["docs", "analysis", "analysis"]),
        ];
        let ranking = rank_labels(&records, |r| r.skills_used.as_slice(), 10);

        assert_eq!(ranking.total, 3);
        let names: Vec<_> = ranking.items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["analysis", "docs", "testing"]);

        let analysis = &ranking.items[0];
        assert_eq!(analysis.usage_count, 3);
        assert!((analysis.mean_score - 220.0 / 3.0).abs() < 1e-9);
        assert!((analysis.success_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(analysis.last_used, at_hour(3));
    }

    #[test]
    fn test_top_k_truncates() {
        let records = vec![with_skills(1, 90.0, &["a", "b", "c"])];
        let ranking = rank_labels(&records, |r| r.skills_used.as_slice(), 2);
        assert_eq!(ranking.total, 3);
        assert_eq!(ranking.items.len(), 2);
    }

    #[test]
    fn test_no_labels() {
        let records = vec![record(at_hour(1), 80.0)];
        let ranking = rank_labels(&records, |r| r.agents_used.as_slice(), 5);
        assert_eq!(ranking.total, 0);
        assert!(ranking.items.is_empty());
    }
}
