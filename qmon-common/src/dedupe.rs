//! Cross-store deduplication
//!
//! Independent writers sometimes record the same assessment in more than
//! one store. The first record seen for an [`IdentityKey`] wins; survivors
//! are then put in chronological order.

use crate::record::{AssessmentRecord, IdentityKey};
use std::collections::HashSet;

/// Keep the first record per identity key, sorted by timestamp
///
/// The sort is stable, so records sharing a timestamp keep first-seen order.
/// Applying `dedupe` to its own output returns the same set.
pub fn dedupe(records: Vec<AssessmentRecord>) -> Vec<AssessmentRecord> {
    let mut seen: HashSet<IdentityKey> = HashSet::with_capacity(records.len());
    let mut survivors: Vec<AssessmentRecord> = records
        .into_iter()
        .filter(|record| seen.insert(record.identity_key()))
        .collect();

    survivors.sort_by_key(|record| record.timestamp);
    survivors
}
