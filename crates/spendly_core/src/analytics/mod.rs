//! Derived, read-only aggregations over in-memory collections.
//!
//! # Responsibility
//! - Totals, balance and savings rate for the summary card.
//! - Category, month-of-year and period groupings for breakdown views.
//!
//! # Invariants
//! - Functions are pure; nothing is cached between calls.
//! - No division produces NaN or infinity for empty or zero-income input.
//! - Calendar fields are taken from `date` in UTC.

pub mod breakdown;
pub mod period;
pub mod summary;
