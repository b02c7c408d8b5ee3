//! Session-level orchestration.
//!
//! # Responsibility
//! - Wire storage helpers and caches into one explicitly constructed session.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod ledger;
