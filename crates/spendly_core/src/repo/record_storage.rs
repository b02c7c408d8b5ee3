//! Generic whole-collection storage for ledger records.
//!
//! # Responsibility
//! - Provide `get_all` / `add` / `update` / `delete` for any `LedgerRecord`.
//! - Apply the configured malformed-data policy on reads.
//!
//! # Invariants
//! - `add` never reuses an id present in the stored collection.
//! - `update` never changes `id` or `created_at`.
//! - Only finite amounts are written; a rejected write leaves the stored
//!   collection untouched.
//! - Log events carry ids and counts only, never amounts or free text.

use crate::config::MalformedDataPolicy;
use crate::kv::{KeyValueStore, KvError};
use crate::model::expense::Expense;
use crate::model::income::Income;
use crate::model::record::{LedgerRecord, RecordId};
use chrono::Utc;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;
use uuid::Uuid;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure while reading or writing a record collection.
#[derive(Debug)]
pub enum StorageError {
    /// Key-value backend failure.
    Kv(KvError),
    /// Stored value under `key` is not a valid collection.
    Malformed {
        key: &'static str,
        source: serde_json::Error,
    },
    /// Collection could not be encoded.
    Serialize {
        key: &'static str,
        source: serde_json::Error,
    },
    /// Record amount is NaN or infinite and would not survive a JSON round trip.
    NonFiniteAmount { kind: &'static str, amount: f64 },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kv(err) => write!(f, "{err}"),
            Self::Malformed { key, source } => {
                write!(f, "stored collection `{key}` is malformed: {source}")
            }
            Self::Serialize { key, source } => {
                write!(f, "failed to encode collection `{key}`: {source}")
            }
            Self::NonFiniteAmount { kind, amount } => {
                write!(f, "{kind} amount must be finite, got `{amount}`")
            }
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kv(err) => Some(err),
            Self::Malformed { source, .. } | Self::Serialize { source, .. } => Some(source),
            Self::NonFiniteAmount { .. } => None,
        }
    }
}

impl From<KvError> for StorageError {
    fn from(value: KvError) -> Self {
        Self::Kv(value)
    }
}

/// Storage helper for one record kind.
///
/// Borrows the store, so several helpers (one per kind) can share it.
pub struct RecordStorage<'s, R, S: KeyValueStore + ?Sized> {
    store: &'s S,
    policy: MalformedDataPolicy,
    _record: PhantomData<fn() -> R>,
}

pub type ExpenseStorage<'s, S> = RecordStorage<'s, Expense, S>;
pub type IncomeStorage<'s, S> = RecordStorage<'s, Income, S>;

impl<'s, R: LedgerRecord, S: KeyValueStore + ?Sized> RecordStorage<'s, R, S> {
    /// Creates a helper with the default (`Strict`) malformed-data policy.
    pub fn new(store: &'s S) -> Self {
        Self::with_policy(store, MalformedDataPolicy::default())
    }

    pub fn with_policy(store: &'s S, policy: MalformedDataPolicy) -> Self {
        Self {
            store,
            policy,
            _record: PhantomData,
        }
    }

    pub fn policy(&self) -> MalformedDataPolicy {
        self.policy
    }

    /// Reads the full collection.
    ///
    /// # Errors
    /// - `Kv` on backend failure.
    /// - `Malformed` when the stored value does not decode and the policy is
    ///   `Strict`. Under `ResetToEmpty` the read returns an empty list.
    pub fn get_all(&self) -> StorageResult<Vec<R>> {
        let Some(raw) = self.store.get_string(R::STORAGE_KEY)? else {
            debug!(
                "event=record_read module=storage status=ok key={} count=0 reason=absent",
                R::STORAGE_KEY
            );
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Vec<R>>(&raw) {
            Ok(records) => {
                debug!(
                    "event=record_read module=storage status=ok key={} count={}",
                    R::STORAGE_KEY,
                    records.len()
                );
                Ok(records)
            }
            Err(source) => match self.policy {
                MalformedDataPolicy::Strict => Err(StorageError::Malformed {
                    key: R::STORAGE_KEY,
                    source,
                }),
                MalformedDataPolicy::ResetToEmpty => {
                    warn!(
                        "event=record_read module=storage status=reset key={} error_code=malformed_collection line={} column={}",
                        R::STORAGE_KEY,
                        source.line(),
                        source.column()
                    );
                    Ok(Vec::new())
                }
            },
        }
    }

    /// Creates a record from `draft`, prepends it and persists the collection.
    ///
    /// Returns the stored record with its generated id and `created_at`.
    ///
    /// # Errors
    /// - `NonFiniteAmount` when the draft amount is NaN or infinite; nothing
    ///   is written.
    pub fn add(&self, draft: R::Draft) -> StorageResult<R> {
        let mut records = self.get_all()?;
        let id = generate_unique_id(&records);
        let record = R::from_draft(id, Utc::now(), draft);
        ensure_finite_amount(&record)?;
        records.insert(0, record.clone());
        self.write_all(&records)?;

        info!(
            "event=record_add module=storage status=ok kind={} id={} count={}",
            R::KIND,
            record.id(),
            records.len()
        );
        Ok(record)
    }

    /// Merges `patch` into the record with `id` and persists the collection.
    ///
    /// Returns the updated record, or `None` when `id` is absent. The
    /// collection is rewritten either way.
    ///
    /// # Errors
    /// - `NonFiniteAmount` when the patched amount is NaN or infinite; nothing
    ///   is written.
    pub fn update(&self, id: &str, patch: &R::Patch) -> StorageResult<Option<R>> {
        let mut records = self.get_all()?;
        let mut updated = None;
        if let Some(record) = records.iter_mut().find(|record| record.id() == id) {
            let mut patched = record.clone();
            patched.apply_patch(patch);
            ensure_finite_amount(&patched)?;
            *record = patched.clone();
            updated = Some(patched);
        }
        self.write_all(&records)?;

        info!(
            "event=record_update module=storage status={} kind={} id={}",
            if updated.is_some() { "ok" } else { "noop" },
            R::KIND,
            id
        );
        Ok(updated)
    }

    /// Removes the record with `id` and persists the remainder.
    ///
    /// Returns the removed record, or `None` when `id` is absent.
    pub fn delete(&self, id: &str) -> StorageResult<Option<R>> {
        let mut records = self.get_all()?;
        let removed = records
            .iter()
            .position(|record| record.id() == id)
            .map(|index| records.remove(index));
        self.write_all(&records)?;

        info!(
            "event=record_delete module=storage status={} kind={} id={} count={}",
            if removed.is_some() { "ok" } else { "noop" },
            R::KIND,
            id,
            records.len()
        );
        Ok(removed)
    }

    fn write_all(&self, records: &[R]) -> StorageResult<()> {
        let encoded = serde_json::to_string(records).map_err(|source| StorageError::Serialize {
            key: R::STORAGE_KEY,
            source,
        })?;
        self.store.set(R::STORAGE_KEY, &encoded)?;
        Ok(())
    }
}

fn ensure_finite_amount<R: LedgerRecord>(record: &R) -> StorageResult<()> {
    let amount = record.amount();
    if amount.is_finite() {
        return Ok(());
    }
    warn!(
        "event=record_write module=storage status=rejected kind={} error_code=non_finite_amount",
        R::KIND
    );
    Err(StorageError::NonFiniteAmount {
        kind: R::KIND,
        amount,
    })
}

fn generate_unique_id<R: LedgerRecord>(existing: &[R]) -> RecordId {
    loop {
        let candidate = Uuid::new_v4().to_string();
        if existing.iter().all(|record| record.id() != candidate) {
            return candidate;
        }
    }
}
