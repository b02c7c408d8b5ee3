//! In-memory record caches with synchronous change notification.
//!
//! # Responsibility
//! - Own the canonical in-memory copy of one collection per session.
//! - Persist first, then mirror the change in memory, then notify.
//!
//! # Invariants
//! - After each successful mutation the in-memory list equals `get_all()`.
//! - A failed persist leaves memory untouched and notifies nobody.

pub mod record_cache;
