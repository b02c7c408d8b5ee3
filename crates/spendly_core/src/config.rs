//! Runtime configuration for core callers (FFI, CLI).
//!
//! # Responsibility
//! - Collect database path, logging settings and the malformed-data policy.
//! - Resolve overrides from `SPENDLY_*` environment variables.
//!
//! # Invariants
//! - Blank environment values are treated as unset.
//! - Unknown values are rejected, never silently defaulted.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "SPENDLY_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SPENDLY_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SPENDLY_LOG_DIR";
pub const ENV_MALFORMED_POLICY: &str = "SPENDLY_MALFORMED_POLICY";

const DEFAULT_DB_FILE_NAME: &str = "spendly.sqlite3";

/// What `get_all` does when a stored collection is not valid JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedDataPolicy {
    /// Surface the parse failure to the caller.
    #[default]
    Strict,
    /// Log a warning and read the collection as empty. The next mutation
    /// overwrites the unreadable value.
    ResetToEmpty,
}

impl MalformedDataPolicy {
    /// Parses `strict` or `reset` (case-insensitive).
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "reset" | "reset_to_empty" => Ok(Self::ResetToEmpty),
            _ => Err(ConfigError::InvalidValue {
                key: ENV_MALFORMED_POLICY,
                value: raw.to_string(),
                expected: "strict|reset",
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::ResetToEmpty => "reset",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue {
        key: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue {
                key,
                value,
                expected,
            } => write!(f, "invalid {key} value `{value}`; expected {expected}"),
        }
    }
}

impl Error for ConfigError {}

/// Resolved settings for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerConfig {
    /// SQLite file holding the key-value entries.
    pub db_path: PathBuf,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute log directory. File logging stays off when `None`.
    pub log_dir: Option<PathBuf>,
    pub malformed_policy: MalformedDataPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            db_path: std::env::temp_dir().join(DEFAULT_DB_FILE_NAME),
            log_level: default_log_level().to_string(),
            log_dir: None,
            malformed_policy: MalformedDataPolicy::default(),
        }
    }
}

impl LedgerConfig {
    /// Defaults overridden by `SPENDLY_*` process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`.
    ///
    /// Split from `from_env` so tests do not mutate process state.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(path) = non_blank(ENV_DB_PATH) {
            config.db_path = PathBuf::from(path);
        }
        if let Some(level) = non_blank(ENV_LOG_LEVEL) {
            config.log_level = normalize_level(&level)
                .map_err(|_| ConfigError::InvalidValue {
                    key: ENV_LOG_LEVEL,
                    value: level.clone(),
                    expected: "trace|debug|info|warn|error",
                })?
                .to_string();
        }
        if let Some(dir) = non_blank(ENV_LOG_DIR) {
            config.log_dir = Some(PathBuf::from(dir));
        }
        if let Some(policy) = non_blank(ENV_MALFORMED_POLICY) {
            config.malformed_policy = MalformedDataPolicy::parse(&policy)?;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        ConfigError, LedgerConfig, MalformedDataPolicy, ENV_DB_PATH, ENV_LOG_LEVEL,
        ENV_MALFORMED_POLICY,
    };
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = LedgerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(config.malformed_policy, MalformedDataPolicy::Strict);
    }

    #[test]
    fn overrides_are_applied_and_blank_values_ignored() {
        let config = LedgerConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/data/ledger.sqlite3"),
            (ENV_LOG_LEVEL, "   "),
            (ENV_MALFORMED_POLICY, "RESET"),
        ]))
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/data/ledger.sqlite3"));
        assert_eq!(config.log_level, LedgerConfig::default().log_level);
        assert_eq!(config.malformed_policy, MalformedDataPolicy::ResetToEmpty);
    }

    #[test]
    fn log_level_is_normalized_and_unknown_levels_rejected() {
        let config =
            LedgerConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "Warning")])).unwrap();
        assert_eq!(config.log_level, "warn");

        let err =
            LedgerConfig::from_lookup(lookup_from(&[(ENV_LOG_LEVEL, "verbose")])).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: ENV_LOG_LEVEL,
                value: "verbose".to_string(),
                expected: "trace|debug|info|warn|error",
            }
        );
    }

    #[test]
    fn unknown_policy_is_rejected() {
        let err =
            LedgerConfig::from_lookup(lookup_from(&[(ENV_MALFORMED_POLICY, "ignore")])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { key, .. } if key == ENV_MALFORMED_POLICY
        ));
    }
}
