//! Record storage helpers over the key-value seam.
//!
//! # Responsibility
//! - Serialize each record collection to one JSON value under one key.
//! - Implement add/update/delete by rewriting the whole collection.
//!
//! # Invariants
//! - Every mutation performs exactly one full read and one full write.
//! - New records are prepended; order is otherwise preserved.
//! - Unknown ids are no-ops reported as `None`, not errors.

pub mod record_storage;
