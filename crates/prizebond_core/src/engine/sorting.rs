//! Bond list ordering modes.
//!
//! No timestamp participates in ordering. `Newest` is the reverse of
//! storage order, expressed as descending id so that applying it twice
//! gives the same list; ids are monotonic, so this tracks insertion.

use crate::model::record::Record;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Ordering applied to a loaded record list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortMode {
    /// Lexicographic by number.
    Ascending,
    /// Reverse lexicographic by number.
    Descending,
    /// Reverse storage order (descending id).
    Newest,
    /// Storage order.
    Oldest,
    /// Storage order.
    #[default]
    Default,
}

impl SortMode {
    pub fn label(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::Default => "default",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            "newest" => Ok(Self::Newest),
            "oldest" => Ok(Self::Oldest),
            "" | "default" => Ok(Self::Default),
            other => Err(format!(
                "unsupported sort mode `{other}`; expected asc|desc|newest|oldest|default"
            )),
        }
    }
}

/// Orders `records` by `mode`.
///
/// Sorting is stable, so equal numbers keep their storage order.
pub fn sort_records(mut records: Vec<Record>, mode: SortMode) -> Vec<Record> {
    match mode {
        SortMode::Ascending => records.sort_by(|a, b| a.number.as_str().cmp(b.number.as_str())),
        SortMode::Descending => records.sort_by(|a, b| b.number.as_str().cmp(a.number.as_str())),
        SortMode::Newest => records.sort_by(|a, b| b.id.cmp(&a.id)),
        SortMode::Oldest | SortMode::Default => {}
    }
    records
}

#[cfg(test)]
mod tests {
    use super::{sort_records, SortMode};
    use crate::model::record::{BondNumber, Record, RecordId};

    fn records(numbers: &[&str]) -> Vec<Record> {
        numbers
            .iter()
            .enumerate()
            .map(|(idx, number)| Record {
                id: RecordId::new(idx as u64 + 1),
                number: BondNumber::parse(number).unwrap(),
                created_at: 0,
            })
            .collect()
    }

    fn numbers(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.number.as_str()).collect()
    }

    fn ids(records: &[Record]) -> Vec<u64> {
        records.iter().map(|r| r.id.get()).collect()
    }

    #[test]
    fn ascending_and_descending_are_exact_reverses_without_ties() {
        let input = records(&["5000000", "0000009", "9100000", "1234567"]);

        let asc = sort_records(input.clone(), SortMode::Ascending);
        let desc = sort_records(input, SortMode::Descending);
        assert_eq!(numbers(&asc), vec!["0000009", "1234567", "5000000", "9100000"]);

        let mut reversed = desc.clone();
        reversed.reverse();
        assert_eq!(asc, reversed);
    }

    #[test]
    fn newest_reverses_storage_order_and_default_keeps_it() {
        let input = records(&["3000000", "1000000", "2000000"]);

        assert_eq!(ids(&sort_records(input.clone(), SortMode::Newest)), vec![3, 2, 1]);
        assert_eq!(ids(&sort_records(input.clone(), SortMode::Oldest)), vec![1, 2, 3]);
        assert_eq!(ids(&sort_records(input, SortMode::Default)), vec![1, 2, 3]);
    }

    #[test]
    fn ties_keep_original_order() {
        let input = records(&["2000000", "1000000", "2000000", "1000000"]);

        let asc = sort_records(input.clone(), SortMode::Ascending);
        assert_eq!(ids(&asc), vec![2, 4, 1, 3]);
        let desc = sort_records(input, SortMode::Descending);
        assert_eq!(ids(&desc), vec![1, 3, 2, 4]);
    }

    #[test]
    fn repeated_application_is_idempotent() {
        let input = records(&["4000000", "1000000", "3000000"]);
        for mode in [
            SortMode::Ascending,
            SortMode::Descending,
            SortMode::Newest,
            SortMode::Oldest,
        ] {
            let once = sort_records(input.clone(), mode);
            let twice = sort_records(once.clone(), mode);
            assert_eq!(once, twice, "{mode}");
        }
    }

    #[test]
    fn parses_menu_labels() {
        assert_eq!("ASC".parse::<SortMode>().unwrap(), SortMode::Ascending);
        assert_eq!("descending".parse::<SortMode>().unwrap(), SortMode::Descending);
        assert_eq!("".parse::<SortMode>().unwrap(), SortMode::Default);
        assert!("random".parse::<SortMode>().is_err());
    }
}
