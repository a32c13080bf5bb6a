//! Domain model for the bond and result collections.
//!
//! # Responsibility
//! - Define the record shape shared by both collections.
//! - Own number validation so every write path uses one rule.
//!
//! # Invariants
//! - Record ids are assigned by storage only.
//! - A `BondNumber` always holds exactly seven ASCII digits.

pub mod record;
