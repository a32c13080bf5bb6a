//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record store calls into the bond checker's use cases.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod bond_service;
