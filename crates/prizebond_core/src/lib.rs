//! Core logic for the prize bond checker.
//! Local record store, matching/sorting and the use-case service that the
//! CLI and FFI front ends share.

pub mod config;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AppConfig, ConfigError};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use engine::matching::intersect_by_value;
pub use engine::sorting::{sort_records, SortMode};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{BondNumber, Collection, Record, RecordId, RecordValidationError};
pub use repo::record_repo::{RecordRepository, RepoError, RepoResult, SqliteRecordRepository};
pub use service::bond_service::{PrizeBondService, SearchOutcome, ServiceError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
