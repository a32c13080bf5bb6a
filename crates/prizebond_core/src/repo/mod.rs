//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract used by services.
//! - Isolate SQLite query details from use-case orchestration.
//!
//! # Invariants
//! - Repositories never validate or deduplicate numbers; callers do.
//! - Repository APIs distinguish semantic errors (`NotReady`,
//!   `InvalidData`) from DB transport errors.

pub mod record_repo;
