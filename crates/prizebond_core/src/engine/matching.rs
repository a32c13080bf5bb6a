//! Bond-to-result matching.

use crate::model::record::{BondNumber, Record};
use std::collections::HashSet;

/// Returns the numbers in `records` that also occur in `against`.
///
/// Membership uses set semantics on `number`. Output follows `records`
/// order and keeps duplicates from `records`.
pub fn intersect_by_value(records: &[Record], against: &[Record]) -> Vec<BondNumber> {
    if records.is_empty() || against.is_empty() {
        return Vec::new();
    }

    let lookup: HashSet<&str> = against.iter().map(|r| r.number.as_str()).collect();
    records
        .iter()
        .filter(|r| lookup.contains(r.number.as_str()))
        .map(|r| r.number.clone())
        .collect()
}
