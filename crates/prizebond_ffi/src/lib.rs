//! Flutter-facing bindings for the prize bond checker.

pub mod api;
