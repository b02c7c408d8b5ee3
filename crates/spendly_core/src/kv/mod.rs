//! Key-value store seam consumed by record storage.
//!
//! # Responsibility
//! - Define the minimal `get_string` / `set` contract the record layer needs.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - A missing key reads as `None`, never as an error.
//! - `set` replaces the whole value for a key; there are no partial writes.
//! - Stores are single-threaded; callers serialize access.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod memory;
pub mod sqlite;

pub use memory::MemoryKvStore;
pub use sqlite::SqliteKvStore;

pub type KvResult<T> = Result<T, KvError>;

/// Failure reported by a key-value backend.
#[derive(Debug)]
pub enum KvError {
    /// SQLite transport or bootstrap failure.
    Db(DbError),
    /// Failure from a caller-provided backend.
    Backend(String),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::Backend(message) => write!(f, "key-value backend failure: {message}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Backend(_) => None,
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Engine(value))
    }
}

/// Persistent string-keyed dictionary.
///
/// Methods take `&self` so one store can back several record collections at
/// once; implementations use interior mutability or a borrowed connection.
pub trait KeyValueStore {
    /// Returns the value stored under `key`, or `None` when absent.
    fn get_string(&self, key: &str) -> KvResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> KvResult<()>;
}
