//! FFI use-case API for the Flutter UI shell.
//!
//! # Responsibility
//! - Expose the home, insert-bond and insert-result page actions as sync
//!   calls returning plain envelopes.
//! - Translate core errors into user-facing messages.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - A blocked database sets `retry_later` instead of failing hard.
//! - List and match calls never fail outward. A read error yields an empty
//!   list with `ok = false` and a message, so it never looks like a truly
//!   empty collection.

use log::warn;
use prizebond_core::db::open_db;
use prizebond_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, AppConfig,
    Collection, PrizeBondService, Record, RecordId, ServiceError, SortMode,
    SqliteRecordRepository,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Expose core crate version through FFI.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path for rolling logs.
///
/// Returns an empty string on success and the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of a rendered bond or result list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordItem {
    /// Store-assigned id; pass back to `record_delete`.
    pub id: u64,
    pub number: String,
    /// Insert time in epoch milliseconds.
    pub created_at: i64,
}

/// Envelope for add/delete actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordActionResponse {
    pub ok: bool,
    /// Id of the created or deleted record.
    pub record_id: Option<u64>,
    /// Human-readable message for the UI notice.
    pub message: String,
    /// Database is held by another session; the user may retry.
    pub retry_later: bool,
}

impl RecordActionResponse {
    fn success(message: impl Into<String>, record_id: u64) -> Self {
        Self {
            ok: true,
            record_id: Some(record_id),
            message: message.into(),
            retry_later: false,
        }
    }

    fn failure(message: impl Into<String>, retry_later: bool) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
            retry_later,
        }
    }
}

/// Envelope for list rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordListResponse {
    /// `false` when the collection could not be read; `items` is then empty.
    pub ok: bool,
    pub items: Vec<RecordItem>,
    /// Effective sort label (`asc|desc|newest|oldest|default`).
    pub applied_sort: String,
    pub message: String,
    /// Database is held by another session; the user may retry.
    pub retry_later: bool,
}

/// Envelope for the home page search box.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BondSearchResponse {
    pub ok: bool,
    pub found: bool,
    pub message: String,
}

/// Envelope for the home page match check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResponse {
    pub ok: bool,
    /// Matched bond numbers in bond list order.
    pub matches: Vec<String>,
    pub message: String,
    /// Database is held by another session; the user may retry.
    pub retry_later: bool,
}

/// Adds a bond from the insert-bond page.
#[flutter_rust_bridge::frb(sync)]
pub fn bond_add(number: String) -> RecordActionResponse {
    record_add_in(&resolve_db_path(), Collection::Bonds, &number)
}

/// Adds a published result from the insert-result page.
#[flutter_rust_bridge::frb(sync)]
pub fn result_add(number: String) -> RecordActionResponse {
    record_add_in(&resolve_db_path(), Collection::Results, &number)
}

/// Deletes one record by id. Unknown ids succeed as a no-op.
///
/// `collection` accepts `bond|bonds|result|results`.
#[flutter_rust_bridge::frb(sync)]
pub fn record_delete(collection: String, id: u64) -> RecordActionResponse {
    match collection.parse::<Collection>() {
        Ok(collection) => record_delete_in(&resolve_db_path(), collection, id),
        Err(err) => RecordActionResponse::failure(err, false),
    }
}

/// Lists bonds using one of the sort menu modes.
///
/// Unknown or missing `sort` falls back to storage order.
#[flutter_rust_bridge::frb(sync)]
pub fn bonds_list(sort: Option<String>) -> RecordListResponse {
    records_list_in(&resolve_db_path(), Collection::Bonds, parse_sort(sort))
}

/// Lists published results in storage order.
#[flutter_rust_bridge::frb(sync)]
pub fn results_list() -> RecordListResponse {
    records_list_in(&resolve_db_path(), Collection::Results, SortMode::Default)
}

/// Checks whether the search box value is in the bond list.
#[flutter_rust_bridge::frb(sync)]
pub fn bond_search(query: String) -> BondSearchResponse {
    bond_search_in(&resolve_db_path(), &query)
}

/// Lists bonds that appear among published results.
#[flutter_rust_bridge::frb(sync)]
pub fn check_matches() -> MatchResponse {
    check_matches_in(&resolve_db_path())
}

fn record_add_in(db_path: &Path, collection: Collection, number: &str) -> RecordActionResponse {
    match with_service(db_path, |service| service.add_record(collection, number)) {
        Ok(Ok(record)) => RecordActionResponse::success(
            format!("{} added.", item_noun(collection)),
            record.id.get(),
        ),
        Ok(Err(err)) => service_failure(&err),
        Err(failure) => failure,
    }
}

fn record_delete_in(db_path: &Path, collection: Collection, id: u64) -> RecordActionResponse {
    match with_service(db_path, |service| service.delete(collection, RecordId::new(id))) {
        Ok(Ok(true)) => {
            RecordActionResponse::success(format!("{} deleted.", item_noun(collection)), id)
        }
        Ok(Ok(false)) => RecordActionResponse::success("Nothing to delete.", id),
        Ok(Err(err)) => service_failure(&err),
        Err(failure) => failure,
    }
}

fn records_list_in(db_path: &Path, collection: Collection, sort: SortMode) -> RecordListResponse {
    let applied_sort = sort.label().to_string();
    match with_service_result(db_path, |service| service.try_list(collection, sort)) {
        Ok(records) => RecordListResponse {
            ok: true,
            message: format!("{} item(s).", records.len()),
            items: records.into_iter().map(to_record_item).collect(),
            applied_sort,
            retry_later: false,
        },
        Err(failure) => {
            warn!(
                "event=records_list module=ffi status=error error_code=list_failed fallback=empty collection={collection}"
            );
            RecordListResponse {
                ok: false,
                items: Vec::new(),
                applied_sort,
                message: format!("Could not load {collection}: {}", failure.message),
                retry_later: failure.retry_later,
            }
        }
    }
}

fn bond_search_in(db_path: &Path, query: &str) -> BondSearchResponse {
    match with_service(db_path, |service| service.search_bond(query)) {
        Ok(Ok(outcome)) => BondSearchResponse {
            ok: true,
            found: outcome.found,
            message: if outcome.found {
                format!("{} is in your bond list.", outcome.query)
            } else {
                format!("{} was not found.", outcome.query)
            },
        },
        Ok(Err(err)) => BondSearchResponse {
            ok: false,
            found: false,
            message: service_failure(&err).message,
        },
        Err(failure) => BondSearchResponse {
            ok: false,
            found: false,
            message: failure.message,
        },
    }
}

fn check_matches_in(db_path: &Path) -> MatchResponse {
    match with_service_result(db_path, |service| service.try_check_matches()) {
        Ok(matched) => {
            let matches: Vec<String> = matched.into_iter().map(String::from).collect();
            let message = if matches.is_empty() {
                "No matches found.".to_string()
            } else {
                format!("Matches found: {}", matches.join(", "))
            };
            MatchResponse {
                ok: true,
                matches,
                message,
                retry_later: false,
            }
        }
        Err(failure) => MatchResponse {
            ok: false,
            matches: Vec::new(),
            message: format!("Could not check matches: {}", failure.message),
            retry_later: failure.retry_later,
        },
    }
}

fn with_service<T>(
    db_path: &Path,
    f: impl FnOnce(&PrizeBondService<SqliteRecordRepository<'_>>) -> T,
) -> Result<T, RecordActionResponse> {
    let conn = open_db(db_path).map_err(|err| {
        RecordActionResponse::failure(format!("database open failed: {err}"), err.is_transient())
    })?;
    let repo = SqliteRecordRepository::try_new(&conn).map_err(|err| {
        RecordActionResponse::failure(format!("record store not ready: {err}"), err.is_transient())
    })?;
    let service = PrizeBondService::new(repo);
    Ok(f(&service))
}

fn with_service_result<T>(
    db_path: &Path,
    f: impl FnOnce(&PrizeBondService<SqliteRecordRepository<'_>>) -> Result<T, ServiceError>,
) -> Result<T, RecordActionResponse> {
    with_service(db_path, f)?.map_err(|err| service_failure(&err))
}

fn service_failure(err: &ServiceError) -> RecordActionResponse {
    let message = match err {
        ServiceError::InvalidNumber(_) => "Enter a 7 digit number.".to_string(),
        ServiceError::EmptySearch => "Enter a bond number to search.".to_string(),
        ServiceError::Duplicate { collection, .. } => {
            format!("This number is already in {collection}.")
        }
        ServiceError::Repo(inner) if inner.is_transient() => {
            "The database is in use by another session. Please retry later.".to_string()
        }
        ServiceError::Repo(inner) => format!("storage failure: {inner}"),
    };
    RecordActionResponse::failure(message, err.is_transient())
}

fn parse_sort(sort: Option<String>) -> SortMode {
    let Some(raw) = sort else {
        return SortMode::Default;
    };
    raw.parse().unwrap_or_else(|err| {
        warn!(
            "event=bonds_list module=ffi status=error error_code=bad_sort fallback=default error={err}"
        );
        SortMode::Default
    })
}

fn item_noun(collection: Collection) -> &'static str {
    match collection {
        Collection::Bonds => "Bond",
        Collection::Results => "Result",
    }
}

fn to_record_item(record: Record) -> RecordItem {
    RecordItem {
        id: record.id.get(),
        number: record.number.into(),
        created_at: record.created_at,
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| match AppConfig::from_env() {
            Ok(config) => config.db_path,
            Err(err) => {
                warn!("event=config_load module=ffi status=error error_code=config_invalid fallback=default error={err}");
                AppConfig::default().db_path
            }
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::{
        bond_search_in, check_matches_in, core_version, init_logging, parse_sort, record_add_in,
        record_delete, record_delete_in, records_list_in,
    };
    use prizebond_core::{Collection, SortMode};
    use std::path::PathBuf;

    fn temp_db() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("prizebond.sqlite3");
        (dir, path)
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_bad_input() {
        assert!(!init_logging("info".to_string(), String::new()).is_empty());
        assert!(!init_logging("verbose".to_string(), "tmp/logs".to_string()).is_empty());
    }

    #[test]
    fn add_list_and_delete_bond() {
        let (_dir, db) = temp_db();

        let added = record_add_in(&db, Collection::Bonds, "1234567");
        assert!(added.ok, "{}", added.message);
        let id = added.record_id.expect("created record id");

        let listed = records_list_in(&db, Collection::Bonds, SortMode::Default);
        assert_eq!(listed.items.len(), 1);
        assert_eq!(listed.items[0].id, id);
        assert_eq!(listed.items[0].number, "1234567");

        let deleted = record_delete_in(&db, Collection::Bonds, id);
        assert!(deleted.ok, "{}", deleted.message);
        assert!(records_list_in(&db, Collection::Bonds, SortMode::Default)
            .items
            .is_empty());
    }

    #[test]
    fn duplicate_and_invalid_adds_fail_without_retry_hint() {
        let (_dir, db) = temp_db();
        assert!(record_add_in(&db, Collection::Results, "0000001").ok);

        let duplicate = record_add_in(&db, Collection::Results, "0000001");
        assert!(!duplicate.ok);
        assert!(!duplicate.retry_later);
        assert!(duplicate.message.contains("already"));

        let invalid = record_add_in(&db, Collection::Results, "12");
        assert!(!invalid.ok);
        assert!(invalid.message.contains("7 digit"));
    }

    #[test]
    fn search_and_match_flow() {
        let (_dir, db) = temp_db();
        record_add_in(&db, Collection::Bonds, "7654321");
        record_add_in(&db, Collection::Bonds, "1111111");

        assert!(!bond_search_in(&db, " ").ok);
        assert!(bond_search_in(&db, "7654321").found);
        assert!(!bond_search_in(&db, "7654320").found);

        let none = check_matches_in(&db);
        assert!(none.ok);
        assert!(none.matches.is_empty());

        record_add_in(&db, Collection::Results, "7654321");
        let some = check_matches_in(&db);
        assert_eq!(some.matches, vec!["7654321".to_string()]);
    }

    #[test]
    fn unknown_collection_and_sort_are_handled() {
        let response = record_delete("coupons".to_string(), 1);
        assert!(!response.ok);
        assert_eq!(parse_sort(Some("sideways".to_string())), SortMode::Default);
        assert_eq!(parse_sort(Some("desc".to_string())), SortMode::Descending);
        assert_eq!(parse_sort(None), SortMode::Default);
    }

    #[test]
    fn unreadable_rows_report_failure_instead_of_empty_results() {
        let (_dir, db) = temp_db();
        assert!(record_add_in(&db, Collection::Bonds, "1234567").ok);
        assert!(record_add_in(&db, Collection::Results, "1234567").ok);
        let conn = rusqlite::Connection::open(&db).expect("open raw connection");
        conn.execute("INSERT INTO bonds (number) VALUES ('12ab');", [])
            .expect("insert corrupt row");
        drop(conn);

        let listed = records_list_in(&db, Collection::Bonds, SortMode::Default);
        assert!(!listed.ok);
        assert!(listed.items.is_empty());
        assert!(!listed.retry_later);
        assert!(listed.message.contains("Could not load bonds"), "{}", listed.message);
        assert!(!listed.message.contains("12ab"), "{}", listed.message);

        let matched = check_matches_in(&db);
        assert!(!matched.ok);
        assert!(matched.matches.is_empty());
        assert!(!matched.retry_later);

        // Results are still readable and list normally.
        let results = records_list_in(&db, Collection::Results, SortMode::Default);
        assert!(results.ok);
        assert_eq!(results.items.len(), 1);
    }

    #[test]
    fn empty_collection_lists_ok() {
        let (_dir, db) = temp_db();
        let listed = records_list_in(&db, Collection::Results, SortMode::Default);
        assert!(listed.ok);
        assert!(listed.items.is_empty());
        assert!(check_matches_in(&db).ok);
    }

    #[test]
    fn locked_database_sets_retry_later() {
        let (_dir, db) = temp_db();
        assert!(record_add_in(&db, Collection::Bonds, "1234567").ok);

        let holder = rusqlite::Connection::open(&db).expect("open holder connection");
        holder
            .execute_batch("BEGIN EXCLUSIVE;")
            .expect("take exclusive lock");

        let added = record_add_in(&db, Collection::Bonds, "7654321");
        assert!(!added.ok);
        assert!(added.retry_later, "{}", added.message);

        let listed = records_list_in(&db, Collection::Bonds, SortMode::Default);
        assert!(!listed.ok);
        assert!(listed.retry_later, "{}", listed.message);

        holder.execute_batch("ROLLBACK;").expect("release lock");
        let listed = records_list_in(&db, Collection::Bonds, SortMode::Default);
        assert!(listed.ok);
        assert_eq!(listed.items.len(), 1);
    }
}
