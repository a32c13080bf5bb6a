//! Command line front end for the prize bond checker.
//!
//! # Responsibility
//! - Map subcommands onto `PrizeBondService` use cases.
//! - Print plain text, or JSON with `--json`.
//!
//! Settings come from `PRIZEBOND_*` environment variables; `--db`
//! overrides the database path.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use prizebond_core::{
    core_version, init_logging, open_db, AppConfig, Collection, PrizeBondService, Record,
    RecordId, SortMode, SqliteRecordRepository,
};
use serde_json::json;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "prizebond", version, about = "Track prize bonds and check them against results")]
struct Cli {
    /// Path to the database file
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Manage your bonds
    Bond {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Manage published winning numbers
    Result {
        #[command(subcommand)]
        action: RecordAction,
    },
    /// Check whether a number is in your bond list
    Search { query: String },
    /// List bonds that appear among published results
    Matches,
    /// Print the core version
    Version,
}

#[derive(Debug, Subcommand)]
enum RecordAction {
    /// Add a 7 digit number
    Add { number: String },
    /// List stored numbers
    List {
        /// asc, desc, newest, oldest or default
        #[arg(long, short, default_value = "default")]
        sort: SortMode,
    },
    /// Delete a record by id
    Delete { id: u64 },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("failed to load configuration")?;
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    if let Some(log_dir) = &config.log_dir {
        let log_dir = log_dir.to_string_lossy();
        init_logging(config.log_level, &log_dir)
            .map_err(anyhow::Error::msg)
            .context("failed to initialize logging")?;
    }

    if let Command::Version = cli.command {
        print_value(cli.json, json!({ "version": core_version() }), core_version());
        return Ok(());
    }

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open database `{}`", config.db_path.display()))?;
    let repo = SqliteRecordRepository::try_new(&conn)?;
    let service = PrizeBondService::new(repo);
    info!("event=cli_command module=cli status=start");

    match cli.command {
        Command::Bond { action } => {
            run_record_action(&service, Collection::Bonds, action, cli.json)
        }
        Command::Result { action } => {
            run_record_action(&service, Collection::Results, action, cli.json)
        }
        Command::Search { query } => {
            let outcome = service.search_bond(&query)?;
            let text = if outcome.found {
                format!("{} is in your bond list", outcome.query)
            } else {
                format!("{} not found", outcome.query)
            };
            print_value(
                cli.json,
                json!({ "query": outcome.query, "found": outcome.found }),
                &text,
            );
            Ok(())
        }
        Command::Matches => {
            let matched: Vec<String> = service
                .try_check_matches()?
                .into_iter()
                .map(String::from)
                .collect();
            let text = if matched.is_empty() {
                "no matches found".to_string()
            } else {
                format!("matches found: {}", matched.join(", "))
            };
            print_value(cli.json, json!({ "matches": matched }), &text);
            Ok(())
        }
        Command::Version => Ok(()),
    }
}

fn run_record_action(
    service: &PrizeBondService<SqliteRecordRepository<'_>>,
    collection: Collection,
    action: RecordAction,
    as_json: bool,
) -> Result<()> {
    match action {
        RecordAction::Add { number } => {
            let record = service.add_record(collection, &number)?;
            print_value(
                as_json,
                serde_json::to_value(&record)?,
                &format!("added {} to {collection} (id {})", record.number, record.id),
            );
        }
        RecordAction::List { sort } => {
            let records = service.try_list(collection, sort)?;
            if as_json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }
        RecordAction::Delete { id } => {
            let removed = service.delete(collection, RecordId::new(id))?;
            let text = if removed {
                format!("deleted {id} from {collection}")
            } else {
                format!("no record {id} in {collection}")
            };
            print_value(as_json, json!({ "id": id, "removed": removed }), &text);
        }
    }
    Ok(())
}

fn print_records(records: &[Record]) {
    if records.is_empty() {
        println!("(empty)");
        return;
    }
    for record in records {
        println!("{:>6}  {}", record.id, record.number);
    }
}

fn print_value(as_json: bool, value: serde_json::Value, text: &str) {
    if as_json {
        println!("{value}");
    } else {
        println!("{text}");
    }
}
