//! Core data layer for Spendly, a local-first personal finance tracker.
//! This crate is the single source of truth for record invariants.

pub mod analytics;
pub mod cache;
pub mod config;
pub mod db;
pub mod kv;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use analytics::breakdown::{
    category_breakdown, category_expenses, category_total, monthly_breakdown, CategoryTotal,
};
pub use analytics::period::{group_by_period, period_key, Period, PeriodGroup, UnknownPeriod};
pub use analytics::summary::{balance, savings_progress, savings_rate, total, FinancialSummary};
pub use cache::record_cache::{
    CacheError, CacheEvent, CacheResult, ExpenseCache, IncomeCache, RecordCache, SubscriptionId,
};
pub use config::{ConfigError, LedgerConfig, MalformedDataPolicy};
pub use kv::{KeyValueStore, KvError, KvResult, MemoryKvStore, SqliteKvStore};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::category::{find_category, ExpenseCategory, DEFAULT_EXPENSE_CATEGORIES};
pub use model::expense::{Expense, ExpenseDraft, ExpensePatch};
pub use model::income::{Income, IncomeDraft, IncomePatch};
pub use model::record::{LedgerRecord, RecordId, RecordValidationError};
pub use repo::record_storage::{
    ExpenseStorage, IncomeStorage, RecordStorage, StorageError, StorageResult,
};
pub use service::ledger::Ledger;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
