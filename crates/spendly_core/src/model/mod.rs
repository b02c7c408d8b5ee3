//! Ledger domain model.
//!
//! # Responsibility
//! - Define the expense and income records persisted by core.
//! - Define drafts (create input) and patches (partial update input).
//! - Validate raw form input before it reaches the cache layer.
//!
//! # Invariants
//! - Record ids are opaque strings, unique within one collection.
//! - `created_at` is stamped once at creation and never patched.

pub mod category;
pub mod expense;
pub mod income;
pub mod record;
