//! Bond checker use-case service.
//!
//! # Responsibility
//! - Guarded inserts: validate, reject duplicates, then persist.
//! - Search, match check and sorted listing for front ends.
//!
//! # Invariants
//! - Nothing reaches the store before validation and duplicate checks pass.
//! - Listing and matching read with the fail-soft policy; a failed read
//!   renders as an empty list.
//! - Failures are returned once and never retried here.

use crate::engine::matching::intersect_by_value;
use crate::engine::sorting::{sort_records, SortMode};
use crate::model::record::{BondNumber, Collection, Record, RecordId, RecordValidationError};
use crate::repo::record_repo::{RecordRepository, RepoError};
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from bond checker use cases.
#[derive(Debug)]
pub enum ServiceError {
    /// Input is not a seven digit number.
    InvalidNumber(RecordValidationError),
    /// Search input is blank after trimming.
    EmptySearch,
    /// The number already exists in the target collection.
    Duplicate {
        collection: Collection,
        number: BondNumber,
    },
    /// Store-level failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Whether the failure is a lock held by another session.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Repo(err) if err.is_transient())
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNumber(err) => write!(f, "{err}"),
            Self::EmptySearch => write!(f, "search input must not be empty"),
            Self::Duplicate { collection, number } => {
                write!(f, "{number} already exists in {collection}")
            }
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNumber(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::EmptySearch | Self::Duplicate { .. } => None,
        }
    }
}

impl From<RecordValidationError> for ServiceError {
    fn from(value: RecordValidationError) -> Self {
        Self::InvalidNumber(value)
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Outcome of a bond search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    /// Trimmed query as compared against stored numbers.
    pub query: String,
    pub found: bool,
}

/// Service facade over a record store.
pub struct PrizeBondService<R: RecordRepository> {
    repo: R,
}

impl<R: RecordRepository> PrizeBondService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Adds a bond through the guarded insert path.
    pub fn add_bond(&self, raw: &str) -> Result<Record, ServiceError> {
        self.add_record(Collection::Bonds, raw)
    }

    /// Adds a published result through the guarded insert path.
    pub fn add_result(&self, raw: &str) -> Result<Record, ServiceError> {
        self.add_record(Collection::Results, raw)
    }

    /// Validates `raw`, rejects duplicates in `collection`, then inserts.
    pub fn add_record(&self, collection: Collection, raw: &str) -> Result<Record, ServiceError> {
        let number = BondNumber::parse(raw)?;

        if self.repo.exists_by_value(collection, number.as_str())? {
            info!(
                "event=record_add module=service status=error error_code=duplicate collection={}",
                collection
            );
            return Err(ServiceError::Duplicate { collection, number });
        }

        let record = self.repo.insert(collection, &number)?;
        info!(
            "event=record_add module=service status=ok collection={} id={}",
            collection, record.id
        );
        Ok(record)
    }

    /// Checks whether a bond with exactly the trimmed `raw` value exists.
    ///
    /// The query is not required to be seven digits; anything non-blank is
    /// compared as-is.
    pub fn search_bond(&self, raw: &str) -> Result<SearchOutcome, ServiceError> {
        let query = raw.trim();
        if query.is_empty() {
            return Err(ServiceError::EmptySearch);
        }

        let found = self.repo.exists_by_value(Collection::Bonds, query)?;
        Ok(SearchOutcome {
            query: query.to_string(),
            found,
        })
    }

    /// Returns bond numbers that appear among published results, in bond
    /// storage order. A failed read counts as an empty collection.
    pub fn check_matches(&self) -> Vec<BondNumber> {
        let bonds = self.repo.list_all_or_empty(Collection::Bonds);
        let results = self.repo.list_all_or_empty(Collection::Results);
        log_match_check(&bonds, &results, intersect_by_value(&bonds, &results))
    }

    /// Like [`check_matches`](Self::check_matches) but propagates read
    /// errors, so "no matches" and "could not read" stay apart.
    pub fn try_check_matches(&self) -> Result<Vec<BondNumber>, ServiceError> {
        let bonds = self.repo.list_all(Collection::Bonds)?;
        let results = self.repo.list_all(Collection::Results)?;
        Ok(log_match_check(
            &bonds,
            &results,
            intersect_by_value(&bonds, &results),
        ))
    }

    /// Lists `collection` ordered by `mode`, failing soft on read errors.
    pub fn list(&self, collection: Collection, mode: SortMode) -> Vec<Record> {
        sort_records(self.repo.list_all_or_empty(collection), mode)
    }

    /// Lists `collection` ordered by `mode`, propagating read errors.
    pub fn try_list(
        &self,
        collection: Collection,
        mode: SortMode,
    ) -> Result<Vec<Record>, ServiceError> {
        Ok(sort_records(self.repo.list_all(collection)?, mode))
    }

    /// Deletes one record. Returns whether it existed.
    pub fn delete(&self, collection: Collection, id: RecordId) -> Result<bool, ServiceError> {
        let removed = self.repo.delete_by_id(collection, id)?;
        if !removed {
            info!(
                "event=record_delete module=service status=ok collection={} id={} removed=false",
                collection, id
            );
        }
        Ok(removed)
    }
}

fn log_match_check(
    bonds: &[Record],
    results: &[Record],
    matched: Vec<BondNumber>,
) -> Vec<BondNumber> {
    info!(
        "event=match_check module=service status=ok bonds={} results={} matched={}",
        bonds.len(),
        results.len(),
        matched.len()
    );
    matched
}
