//! Ledger session: the pair of caches for one application session.
//!
//! # Responsibility
//! - Build expense and income caches over one injected store.
//! - Load both collections and expose them to callers explicitly.
//!
//! # Invariants
//! - The store is passed in; there is no process-wide store.
//! - The two caches never share a transaction.

use crate::analytics::summary::FinancialSummary;
use crate::cache::record_cache::{CacheResult, ExpenseCache, IncomeCache, RecordCache};
use crate::config::MalformedDataPolicy;
use crate::kv::KeyValueStore;
use crate::repo::record_storage::RecordStorage;

/// Expense and income caches sharing one store.
pub struct Ledger<'s, S: KeyValueStore + ?Sized> {
    expenses: ExpenseCache<'s, S>,
    incomes: IncomeCache<'s, S>,
}

impl<'s, S: KeyValueStore + ?Sized> Ledger<'s, S> {
    /// Creates an unloaded session; call `load` before mutating.
    pub fn new(store: &'s S, policy: MalformedDataPolicy) -> Self {
        Self {
            expenses: RecordCache::new(RecordStorage::with_policy(store, policy)),
            incomes: RecordCache::new(RecordStorage::with_policy(store, policy)),
        }
    }

    /// Creates a session and loads both collections.
    pub fn open(store: &'s S, policy: MalformedDataPolicy) -> CacheResult<Self> {
        let mut ledger = Self::new(store, policy);
        ledger.load()?;
        Ok(ledger)
    }

    /// Loads any collection that has not been loaded yet.
    pub fn load(&mut self) -> CacheResult<()> {
        self.expenses.load()?;
        self.incomes.load()?;
        Ok(())
    }

    /// `true` while either collection is still loading.
    pub fn is_loading(&self) -> bool {
        self.expenses.is_loading() || self.incomes.is_loading()
    }

    pub fn expenses(&self) -> &ExpenseCache<'s, S> {
        &self.expenses
    }

    pub fn expenses_mut(&mut self) -> &mut ExpenseCache<'s, S> {
        &mut self.expenses
    }

    pub fn incomes(&self) -> &IncomeCache<'s, S> {
        &self.incomes
    }

    pub fn incomes_mut(&mut self) -> &mut IncomeCache<'s, S> {
        &mut self.incomes
    }

    /// Summary card figures over the current in-memory collections.
    pub fn summary(&self) -> FinancialSummary {
        FinancialSummary::from_records(self.incomes.records(), self.expenses.records())
    }
}
