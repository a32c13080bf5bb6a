//! Record domain model.
//!
//! # Responsibility
//! - Define `Record`, the row shape of both `bonds` and `results`.
//! - Provide the validated `BondNumber` newtype.
//!
//! # Invariants
//! - `BondNumber::parse` is the only way to build a number; input is trimmed
//!   and must match `^\d{7}$`.
//! - `RecordId` values come from SQLite `AUTOINCREMENT` and are never reused.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static BOND_NUMBER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{7}$").expect("valid bond number regex"));

/// Which of the two independent collections a record lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Bonds owned by the user.
    Bonds,
    /// Published winning numbers.
    Results,
}

impl Collection {
    pub const ALL: [Collection; 2] = [Collection::Bonds, Collection::Results];

    /// Backing table name. Never derived from user input.
    pub(crate) fn table(self) -> &'static str {
        match self {
            Self::Bonds => "bonds",
            Self::Results => "results",
        }
    }

    /// Stable label used in logs and front-end payloads.
    pub fn label(self) -> &'static str {
        match self {
            Self::Bonds => "bonds",
            Self::Results => "results",
        }
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Collection {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bond" | "bonds" => Ok(Self::Bonds),
            "result" | "results" => Ok(Self::Results),
            other => Err(format!(
                "unknown collection `{other}`; expected bonds|results"
            )),
        }
    }
}

/// Storage-assigned record identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors for record input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Input is not exactly seven decimal digits after trimming.
    InvalidNumber(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber(value) => {
                write!(f, "number must be exactly 7 digits, got `{value}`")
            }
        }
    }
}

impl Error for RecordValidationError {}

/// A seven digit prize bond or result number.
///
/// Kept as a string so leading zeros survive (`"0000001"`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BondNumber(String);

impl BondNumber {
    /// Trims `raw` and accepts it only when it is exactly seven digits.
    pub fn parse(raw: &str) -> Result<Self, RecordValidationError> {
        let trimmed = raw.trim();
        if BOND_NUMBER_RE.is_match(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(RecordValidationError::InvalidNumber(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for BondNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for BondNumber {
    type Error = RecordValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BondNumber> for String {
    fn from(value: BondNumber) -> Self {
        value.0
    }
}

/// One stored bond or result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub number: BondNumber,
    /// Unix epoch milliseconds, set by storage on insert.
    pub created_at: i64,
}

#[cfg(test)]
mod tests {
    use super::{BondNumber, Collection, RecordValidationError};

    #[test]
    fn parse_trims_and_keeps_leading_zeros() {
        let number = BondNumber::parse("  0000001 ").unwrap();
        assert_eq!(number.as_str(), "0000001");
    }

    #[test]
    fn parse_rejects_wrong_length_and_non_digits() {
        for raw in ["", "123456", "12345678", "12a4567", "１２３４５６７", "123 4567"] {
            let err = BondNumber::parse(raw).unwrap_err();
            assert!(matches!(err, RecordValidationError::InvalidNumber(_)), "{raw}");
        }
    }

    #[test]
    fn collection_parses_singular_and_plural_labels() {
        assert_eq!("Bond".parse::<Collection>().unwrap(), Collection::Bonds);
        assert_eq!("results".parse::<Collection>().unwrap(), Collection::Results);
        assert!("coupons".parse::<Collection>().is_err());
    }
}
