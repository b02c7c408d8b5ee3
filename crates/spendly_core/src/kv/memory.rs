//! Process-local key-value store.

use super::{KeyValueStore, KvResult};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory store for tests and ephemeral sessions.
///
/// Not `Sync`: interior mutability is a plain `RefCell`.
#[derive(Debug, Default)]
pub struct MemoryKvStore {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemoryKvStore {
    fn get_string(&self, key: &str) -> KvResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
