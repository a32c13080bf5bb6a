//! Connection bootstrap utilities for SQLite.
//!
//! # Responsibility
//! - Open the bond database file, or an in-memory database for tests.
//! - Configure connection pragmas and the busy timeout.
//! - Run schema migrations before handing the connection out.
//!
//! # Invariants
//! - Returned connections have migrations fully applied.
//! - Lock contention past `BUSY_TIMEOUT` surfaces as `DbError::Blocked`.

use super::migrations::apply_migrations;
use super::{DbError, DbResult};
use log::{error, info, warn};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the database file at `path` and applies pending
/// migrations.
///
/// Missing parent directories are created first.
///
/// # Side effects
/// - Emits `db_open` logging events with duration and status.
pub fn open_db(path: impl AsRef<Path>) -> DbResult<Connection> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            if let Err(err) = std::fs::create_dir_all(parent) {
                warn!(
                    "event=db_open module=db status=error mode=file error_code=parent_dir_failed error={}",
                    err
                );
            }
        }
    }
    open_with("file", || Connection::open(path))
}

/// Opens a fresh in-memory database with the full schema applied.
pub fn open_db_in_memory() -> DbResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> DbResult<Connection> {
    let started_at = Instant::now();
    info!("event=db_open module=db status=start mode={mode}");

    let result = connect()
        .map_err(DbError::from)
        .map_err(|err| (err, "db_open_failed"))
        .and_then(|mut conn| match bootstrap_connection(&mut conn) {
            Ok(()) => Ok(conn),
            Err(err) => Err((err, "db_bootstrap_failed")),
        });

    match result {
        Ok(conn) => {
            info!(
                "event=db_open module=db status=ok mode={mode} duration_ms={}",
                started_at.elapsed().as_millis()
            );
            Ok(conn)
        }
        Err((err, error_code)) => {
            let error_code = if err.is_transient() {
                "db_blocked"
            } else {
                error_code
            };
            error!(
                "event=db_open module=db status=error mode={mode} duration_ms={} error_code={error_code} error={err}",
                started_at.elapsed().as_millis()
            );
            Err(err)
        }
    }
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)?;
    Ok(())
}
