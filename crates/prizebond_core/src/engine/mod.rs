//! Pure matching and ordering over records already loaded from storage.
//!
//! # Invariants
//! - Nothing here touches storage or logging; inputs are never mutated.

pub mod matching;
pub mod sorting;
