//! Reactive cache over a `RecordStorage`.

use crate::kv::KeyValueStore;
use crate::model::expense::Expense;
use crate::model::income::Income;
use crate::model::record::{LedgerRecord, RecordId};
use crate::repo::record_storage::{RecordStorage, StorageError};
use log::{debug, info};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type CacheResult<T> = Result<T, CacheError>;

#[derive(Debug)]
pub enum CacheError {
    /// Mutation attempted before the initial load completed.
    NotLoaded { kind: &'static str },
    Storage(StorageError),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotLoaded { kind } => {
                write!(f, "{kind} cache used before its initial load completed")
            }
            Self::Storage(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotLoaded { .. } => None,
            Self::Storage(err) => Some(err),
        }
    }
}

impl From<StorageError> for CacheError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Change delivered to subscribers after a successful load or mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum CacheEvent<R> {
    Loaded { count: usize },
    Added(R),
    /// `record` is `None` when the id was not present.
    Updated { id: RecordId, record: Option<R> },
    /// `removed` is `None` when the id was not present.
    Deleted { id: RecordId, removed: Option<R> },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<R> = Box<dyn FnMut(&CacheEvent<R>)>;

/// Session-scoped cache for one record kind.
pub struct RecordCache<'s, R: LedgerRecord, S: KeyValueStore + ?Sized> {
    storage: RecordStorage<'s, R, S>,
    records: Vec<R>,
    is_loading: bool,
    subscribers: Vec<(SubscriptionId, Subscriber<R>)>,
    next_subscription: u64,
}

pub type ExpenseCache<'s, S> = RecordCache<'s, Expense, S>;
pub type IncomeCache<'s, S> = RecordCache<'s, Income, S>;

impl<'s, R: LedgerRecord, S: KeyValueStore + ?Sized> RecordCache<'s, R, S> {
    /// Creates an unloaded cache. `is_loading()` stays `true` until `load`.
    pub fn new(storage: RecordStorage<'s, R, S>) -> Self {
        Self {
            storage,
            records: Vec::new(),
            is_loading: true,
            subscribers: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Creates a cache and performs its initial load.
    pub fn open(storage: RecordStorage<'s, R, S>) -> CacheResult<Self> {
        let mut cache = Self::new(storage);
        cache.load()?;
        Ok(cache)
    }

    /// Loads the collection from storage.
    ///
    /// Runs once; calls after a successful load are no-ops. A failed load
    /// keeps the cache in the loading state so it can be retried.
    pub fn load(&mut self) -> CacheResult<()> {
        if !self.is_loading {
            return Ok(());
        }

        self.records = self.storage.get_all()?;
        self.is_loading = false;
        info!(
            "event=cache_load module=cache status=ok kind={} count={}",
            R::KIND,
            self.records.len()
        );
        self.notify(&CacheEvent::Loaded {
            count: self.records.len(),
        });
        Ok(())
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Current records, most recently added first.
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    pub fn storage(&self) -> &RecordStorage<'s, R, S> {
        &self.storage
    }

    /// Persists a new record, prepends it in memory and notifies.
    pub fn add_record(&mut self, draft: R::Draft) -> CacheResult<R> {
        self.ensure_loaded()?;

        let record = self.storage.add(draft)?;
        self.records.insert(0, record.clone());
        self.notify(&CacheEvent::Added(record.clone()));
        Ok(record)
    }

    /// Persists a patch, mirrors it in memory and notifies.
    ///
    /// Returns `None` (and still notifies) when `id` is absent.
    pub fn update_record(&mut self, id: &str, patch: R::Patch) -> CacheResult<Option<R>> {
        self.ensure_loaded()?;

        self.storage.update(id, &patch)?;
        let record = self
            .records
            .iter_mut()
            .find(|record| record.id() == id)
            .map(|record| {
                record.apply_patch(&patch);
                record.clone()
            });
        self.notify(&CacheEvent::Updated {
            id: id.to_string(),
            record: record.clone(),
        });
        Ok(record)
    }

    /// Persists a removal, mirrors it in memory and notifies.
    pub fn delete_record(&mut self, id: &str) -> CacheResult<Option<R>> {
        self.ensure_loaded()?;

        self.storage.delete(id)?;
        let removed = self
            .records
            .iter()
            .position(|record| record.id() == id)
            .map(|index| self.records.remove(index));
        self.notify(&CacheEvent::Deleted {
            id: id.to_string(),
            removed: removed.clone(),
        });
        Ok(removed)
    }

    /// Registers a callback invoked synchronously after every change.
    pub fn subscribe(&mut self, callback: impl FnMut(&CacheEvent<R>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Removes a callback. Returns `false` when `id` was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(existing, _)| *existing != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn ensure_loaded(&self) -> CacheResult<()> {
        if self.is_loading {
            return Err(CacheError::NotLoaded { kind: R::KIND });
        }
        Ok(())
    }

    fn notify(&mut self, event: &CacheEvent<R>) {
        debug!(
            "event=cache_notify module=cache status=ok kind={} subscribers={}",
            R::KIND,
            self.subscribers.len()
        );
        for (_, subscriber) in &mut self.subscribers {
            subscriber(event);
        }
    }
}
