//! SQLite bootstrap for the on-device key-value engine.
//!
//! # Responsibility
//! - Open and configure SQLite connections for Spendly core.
//! - Apply engine migrations in deterministic order.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Stores must not read/write entries before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure while opening or bootstrapping the `kv_entries` engine.
#[derive(Debug)]
pub enum DbError {
    /// SQLite rejected a statement or the file could not be opened.
    Engine(rusqlite::Error),
    /// The file's `kv_entries` layout was written by a newer build.
    EngineVersionTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Engine(err) => write!(f, "key-value engine error: {err}"),
            Self::EngineVersionTooNew { found, supported } => write!(
                f,
                "ledger file uses key-value engine v{found}; this build reads up to v{supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Engine(err) => Some(err),
            Self::EngineVersionTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Engine(value)
    }
}
