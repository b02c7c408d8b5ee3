//! Flutter bridge for Spendly core.

pub mod api;
