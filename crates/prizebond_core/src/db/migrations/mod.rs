//! Schema setup for the `bonds` and `results` collections.
//!
//! # Responsibility
//! - Bring a fresh or older database file up to the schema this binary
//!   reads and writes.
//!
//! # Invariants
//! - Every script only creates what is absent (`CREATE TABLE IF NOT EXISTS`),
//!   so re-running one over an existing file leaves stored bonds and
//!   results untouched.
//! - Scripts are listed in increasing `version`; the highest applied one is
//!   written to `PRAGMA user_version` in the same transaction.
//! - A file stamped with a newer version than `latest_version()` is refused
//!   rather than downgraded.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[SchemaStep {
    version: 1,
    name: "bond_and_result_collections",
    sql: include_str!("0001_init.sql"),
}];

/// Returns the schema version this binary expects.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Reads the schema version stamped on the database file.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Runs every schema step newer than the file's stamped version.
///
/// No-op when the file is already current.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let stamped = current_version(conn)?;
    let latest = latest_version();
    if stamped > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: stamped,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > stamped)
        .collect();
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
        info!(
            "event=db_migrate module=db status=ok version={} name={}",
            step.version, step.name
        );
    }
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{apply_migrations, current_version, latest_version, SCHEMA_STEPS};
    use rusqlite::Connection;

    #[test]
    fn versions_are_strictly_increasing() {
        for pair in SCHEMA_STEPS.windows(2) {
            assert!(pair[0].version < pair[1].version);
        }
        assert_eq!(latest_version(), SCHEMA_STEPS.len() as u32);
    }

    #[test]
    fn replaying_scripts_keeps_existing_rows() {
        let mut conn = Connection::open_in_memory().unwrap();
        apply_migrations(&mut conn).unwrap();
        conn.execute("INSERT INTO bonds (number) VALUES ('1234567');", [])
            .unwrap();
        conn.execute("INSERT INTO results (number) VALUES ('7654321');", [])
            .unwrap();

        // A file whose stamp was lost still upgrades without data loss.
        conn.pragma_update(None, "user_version", 0).unwrap();
        apply_migrations(&mut conn).unwrap();

        assert_eq!(current_version(&conn).unwrap(), latest_version());
        for table in ["bonds", "results"] {
            let rows: i64 = conn
                .query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
                    row.get(0)
                })
                .unwrap();
            assert_eq!(rows, 1, "{table}");
        }
    }
}
