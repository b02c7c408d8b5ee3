//! Shared record contract and form validation helpers.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Stable identifier of a record within its collection.
///
/// New records get a UUID v4 string. Ids written by older builds (for example
/// millisecond timestamps) are kept verbatim, so the id stays a plain string.
pub type RecordId = String;

/// Behavior shared by every persisted record kind.
///
/// Storage helpers, caches and aggregations are written once against this
/// trait and instantiated per kind.
pub trait LedgerRecord: Clone + Serialize + DeserializeOwned {
    /// Create input: the record without `id` and `created_at`.
    type Draft;
    /// Partial update input. Absent fields are preserved on merge.
    type Patch;

    /// Key of the collection in the key-value store.
    const STORAGE_KEY: &'static str;
    /// Short label used in log events.
    const KIND: &'static str;

    /// Builds a full record from a draft plus creation metadata.
    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: Self::Draft) -> Self;

    fn id(&self) -> &str;
    fn amount(&self) -> f64;
    /// User-specified occurrence time.
    fn date(&self) -> DateTime<Utc>;
    fn created_at(&self) -> DateTime<Utc>;

    /// Shallow-merges `patch` into this record.
    ///
    /// # Invariants
    /// - `id` and `created_at` are never changed.
    fn apply_patch(&mut self, patch: &Self::Patch);
}

/// Rejected form input. Callers skip the operation on any of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Required field was empty or whitespace.
    MissingField(&'static str),
    /// Amount text is not a finite decimal number.
    InvalidAmount(String),
    /// Date text is not an RFC 3339 / ISO-8601 timestamp.
    InvalidDate(String),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "{field} is required"),
            Self::InvalidAmount(value) => write!(f, "invalid amount `{value}`"),
            Self::InvalidDate(value) => write!(f, "invalid date `{value}`; expected ISO-8601"),
        }
    }
}

impl Error for RecordValidationError {}

/// Returns the trimmed field text, or `MissingField` when blank.
pub fn require_text(field: &'static str, raw: &str) -> Result<String, RecordValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RecordValidationError::MissingField(field));
    }
    Ok(trimmed.to_string())
}

/// Parses user-typed amount text.
///
/// Negative values are accepted; the ledger does not enforce sign.
pub fn parse_amount(raw: &str) -> Result<f64, RecordValidationError> {
    let text = require_text("amount", raw)?;
    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RecordValidationError::InvalidAmount(text)),
    }
}

/// Parses an RFC 3339 timestamp and normalizes it to UTC.
pub fn parse_date(raw: &str) -> Result<DateTime<Utc>, RecordValidationError> {
    let text = require_text("date", raw)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|value| value.with_timezone(&Utc))
        .map_err(|_| RecordValidationError::InvalidDate(text))
}
