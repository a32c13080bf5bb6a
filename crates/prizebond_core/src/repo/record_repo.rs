//! Record store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert, list-all, delete-by-id and exists-by-value over the
//!   `bonds` and `results` tables.
//! - Own the fail-soft read policy used by list rendering.
//!
//! # Invariants
//! - Ids are assigned by SQLite on insert and never reused.
//! - `list_all` returns rows in storage order (ascending id).
//! - Deleting a missing id is a no-op.
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::migrations::{current_version, latest_version};
use crate::db::DbError;
use crate::model::record::{BondNumber, Collection, Record, RecordId};
use log::{debug, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors raised by record persistence and queries.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Connection schema is behind; migrations have not run yet.
    NotReady { schema_version: u32, required: u32 },
    InvalidData(String),
}

impl RepoError {
    /// See [`DbError::is_transient`].
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Db(err) if err.is_transient())
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotReady {
                schema_version,
                required,
            } => write!(
                f,
                "record store not ready: schema version {schema_version}, required {required}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotReady { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::from(value))
    }
}

/// Record store over two independent collections.
pub trait RecordRepository {
    /// Persists a new record and returns it with its assigned id.
    fn insert(&self, collection: Collection, number: &BondNumber) -> RepoResult<Record>;

    /// Returns every record in storage order.
    fn list_all(&self, collection: Collection) -> RepoResult<Vec<Record>>;

    /// Removes the record with `id`. Returns whether a row was removed.
    fn delete_by_id(&self, collection: Collection, id: RecordId) -> RepoResult<bool>;

    /// Fail-soft variant of [`list_all`](Self::list_all).
    ///
    /// Errors are logged and reported as an empty list so rendering never
    /// fails. Stored data is untouched. Use `list_all` where the caller
    /// needs to tell "empty" and "failed" apart.
    fn list_all_or_empty(&self, collection: Collection) -> Vec<Record> {
        match self.list_all(collection) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "event=record_list module=repo status=error error_code=list_failed fallback=empty collection={} error={}",
                    collection, err
                );
                Vec::new()
            }
        }
    }

    /// Returns whether any record in `collection` has exactly `value`.
    ///
    /// Linear scan over `list_all`; collections are expected to hold tens
    /// to low hundreds of rows.
    fn exists_by_value(&self, collection: Collection, value: &str) -> RepoResult<bool> {
        let records = self.list_all(collection)?;
        Ok(records.iter().any(|record| record.number.as_str() == value))
    }
}

impl<R: RecordRepository + ?Sized> RecordRepository for &R {
    fn insert(&self, collection: Collection, number: &BondNumber) -> RepoResult<Record> {
        (**self).insert(collection, number)
    }

    fn list_all(&self, collection: Collection) -> RepoResult<Vec<Record>> {
        (**self).list_all(collection)
    }

    fn delete_by_id(&self, collection: Collection, id: RecordId) -> RepoResult<bool> {
        (**self).delete_by_id(collection, id)
    }
}

/// SQLite-backed record store.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    /// Wraps a connection whose schema is fully migrated.
    ///
    /// Returns `NotReady` when the connection did not come from
    /// [`open_db`](crate::db::open_db) (or equivalent).
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let schema_version = current_version(conn)?;
        let required = latest_version();
        if schema_version < required {
            return Err(RepoError::NotReady {
                schema_version,
                required,
            });
        }
        Ok(Self { conn })
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn insert(&self, collection: Collection, number: &BondNumber) -> RepoResult<Record> {
        let table = collection.table();
        let record = self.conn.query_row(
            &format!("INSERT INTO {table} (number) VALUES (?1) RETURNING id, number, created_at;"),
            [number.as_str()],
            |row| Ok(parse_record_row(row)),
        )??;

        debug!(
            "event=record_insert module=repo status=ok collection={} id={}",
            collection, record.id
        );
        Ok(record)
    }

    fn list_all(&self, collection: Collection) -> RepoResult<Vec<Record>> {
        let table = collection.table();
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT id, number, created_at FROM {table} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(parse_record_row(row)?);
        }

        Ok(records)
    }

    fn delete_by_id(&self, collection: Collection, id: RecordId) -> RepoResult<bool> {
        let table = collection.table();
        let Ok(raw_id) = i64::try_from(id.get()) else {
            return Ok(false);
        };
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {table} WHERE id = ?1;"), params![raw_id])?;

        debug!(
            "event=record_delete module=repo status=ok collection={} id={} removed={}",
            collection,
            id,
            changed > 0
        );
        Ok(changed > 0)
    }
}

fn parse_record_row(row: &Row<'_>) -> RepoResult<Record> {
    let raw_id: i64 = row.get("id")?;
    let id = u64::try_from(raw_id)
        .map(RecordId::new)
        .map_err(|_| RepoError::InvalidData(format!("negative id `{raw_id}`")))?;

    let number_text: String = row.get("number")?;
    // The stored text stays out of the message; errors end up in logs.
    let number = BondNumber::parse(&number_text).map_err(|_| {
        RepoError::InvalidData(format!(
            "record {id}: stored number is not 7 digits (len={})",
            number_text.chars().count()
        ))
    })?;

    Ok(Record {
        id,
        number,
        created_at: row.get("created_at")?,
    })
}
