//! Merge-by-email.

use crate::model::record::Record;
use std::collections::HashSet;

/// Survivors of a merge plus what was dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeOutcome {
    /// Incoming records to append, in incoming order.
    pub accepted: Vec<Record>,
    pub skipped_duplicate: usize,
    pub skipped_missing_email: usize,
}

/// Selects incoming records whose email is non-empty and not yet taken.
///
/// The taken set starts from `existing` and grows with every accepted
/// record, so duplicates inside `incoming` are dropped too. Comparison is
/// exact (case-sensitive).
pub fn merge_by_email(existing: &[Record], incoming: Vec<Record>) -> MergeOutcome {
    let mut taken = existing
        .iter()
        .filter_map(|record| record.email_key().map(str::to_owned))
        .collect::<HashSet<_>>();
    let mut outcome = MergeOutcome::default();

    for record in incoming {
        let Some(email) = record.email_key() else {
            outcome.skipped_missing_email += 1;
            continue;
        };
        if !taken.insert(email.to_owned()) {
            outcome.skipped_duplicate += 1;
            continue;
        }
        outcome.accepted.push(record);
    }

    outcome
}
