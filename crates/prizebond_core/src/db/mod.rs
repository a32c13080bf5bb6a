//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure the local SQLite file that holds both collections.
//! - Apply schema migrations in deterministic order before first use.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - No collection is read or written before migrations succeed.
//! - A connection blocked by another session is reported as `Blocked`,
//!   never retried automatically.

use rusqlite::ErrorCode;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    /// Another session holds the database lock past the busy timeout.
    Blocked(rusqlite::Error),
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl DbError {
    /// Returns whether the caller should show a transient "retry later"
    /// notice instead of treating the failure as fatal.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Blocked(_))
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Blocked(err) => {
                write!(f, "database is in use by another session, retry later ({err})")
            }
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Blocked(err) | Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        match value.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                Self::Blocked(value)
            }
            _ => Self::Sqlite(value),
        }
    }
}
