//! Income record model.

use super::record::{
    parse_amount, parse_date, require_text, LedgerRecord, RecordId, RecordValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded income entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: RecordId,
    pub amount: f64,
    /// Where the money came from (employer, client, ...).
    pub source: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Create input for an income entry.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeDraft {
    pub amount: f64,
    pub source: String,
    pub description: String,
    pub date: DateTime<Utc>,
}

impl IncomeDraft {
    /// Builds a draft from raw form fields.
    ///
    /// # Errors
    /// - `MissingField` when amount, description or source is blank.
    /// - `InvalidAmount` / `InvalidDate` when text does not parse.
    pub fn from_form(
        amount: &str,
        description: &str,
        source: &str,
        date: &str,
    ) -> Result<Self, RecordValidationError> {
        Ok(Self {
            amount: parse_amount(amount)?,
            source: require_text("source", source)?,
            description: require_text("description", description)?,
            date: parse_date(date)?,
        })
    }
}

/// Partial update for an income entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncomePatch {
    pub amount: Option<f64>,
    pub source: Option<String>,
    pub description: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl IncomePatch {
    pub fn from_form(
        amount: &str,
        description: &str,
        source: &str,
        date: &str,
    ) -> Result<Self, RecordValidationError> {
        let draft = IncomeDraft::from_form(amount, description, source, date)?;
        Ok(Self::from(draft))
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<IncomeDraft> for IncomePatch {
    fn from(draft: IncomeDraft) -> Self {
        Self {
            amount: Some(draft.amount),
            source: Some(draft.source),
            description: Some(draft.description),
            date: Some(draft.date),
        }
    }
}

impl LedgerRecord for Income {
    type Draft = IncomeDraft;
    type Patch = IncomePatch;

    const STORAGE_KEY: &'static str = "incomes";
    const KIND: &'static str = "income";

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: IncomeDraft) -> Self {
        Self {
            id,
            amount: draft.amount,
            source: draft.source,
            description: draft.description,
            date: draft.date,
            created_at,
        }
    }

    fn id(&self) -> &str {
        &self.id
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn date(&self) -> DateTime<Utc> {
        self.date
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    fn apply_patch(&mut self, patch: &IncomePatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(source) = &patch.source {
            self.source.clone_from(source);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}
