//! Substring filter over id, name and email.

use crate::model::record::Record;

/// Lowercases raw search input. Whitespace is kept as typed.
pub fn normalize_query(raw: &str) -> String {
    raw.to_lowercase()
}

/// Returns whether `record` matches an already-normalized `query`.
///
/// The id is compared through its display form, so `12` matches `"1"`.
pub fn record_matches(record: &Record, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let id_hit = record
        .id
        .as_ref()
        .is_some_and(|id| id.to_string().to_lowercase().contains(query));
    let name_hit = record
        .name
        .as_deref()
        .is_some_and(|name| name.to_lowercase().contains(query));
    let email_hit = record
        .email
        .as_deref()
        .is_some_and(|email| email.to_lowercase().contains(query));

    id_hit || name_hit || email_hit
}

/// Returns matching records in set order.
pub fn filter_records<'a>(records: &'a [Record], query: &str) -> Vec<&'a Record> {
    records
        .iter()
        .filter(|record| record_matches(record, query))
        .collect()
}
