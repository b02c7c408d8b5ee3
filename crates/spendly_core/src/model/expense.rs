//! Expense record model.
//!
//! # Invariants
//! - Wire names are camelCase (`createdAt`) to stay readable by older builds.
//! - `category` is free-form; the default catalogue is not enforced.

use super::record::{
    parse_amount, parse_date, require_text, LedgerRecord, RecordId, RecordValidationError,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: RecordId,
    /// Signed; positivity is not enforced.
    pub amount: f64,
    pub description: String,
    pub category: String,
    /// When the expense happened, as entered by the user.
    pub date: DateTime<Utc>,
    /// When the record was created. Never patched.
    pub created_at: DateTime<Utc>,
}

/// Create input for an expense.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub amount: f64,
    pub description: String,
    pub category: String,
    pub date: DateTime<Utc>,
}

impl ExpenseDraft {
    /// Builds a draft from raw form fields.
    ///
    /// # Errors
    /// - `MissingField` when amount, description or category is blank.
    /// - `InvalidAmount` / `InvalidDate` when text does not parse.
    pub fn from_form(
        amount: &str,
        description: &str,
        category: &str,
        date: &str,
    ) -> Result<Self, RecordValidationError> {
        Ok(Self {
            amount: parse_amount(amount)?,
            description: require_text("description", description)?,
            category: require_text("category", category)?,
            date: parse_date(date)?,
        })
    }
}

/// Partial update for an expense. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpensePatch {
    pub amount: Option<f64>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    /// Builds a full-form patch; the edit form always resubmits every field.
    pub fn from_form(
        amount: &str,
        description: &str,
        category: &str,
        date: &str,
    ) -> Result<Self, RecordValidationError> {
        let draft = ExpenseDraft::from_form(amount, description, category, date)?;
        Ok(Self::from(draft))
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<ExpenseDraft> for ExpensePatch {
    fn from(draft: ExpenseDraft) -> Self {
        Self {
            amount: Some(draft.amount),
            description: Some(draft.description),
            category: Some(draft.category),
            date: Some(draft.date),
        }
    }
}

impl LedgerRecord for Expense {
    type Draft = ExpenseDraft;
    type Patch = ExpensePatch;

    const STORAGE_KEY: &'static str = "expenses";
    const KIND: &'static str = "expense";

    fn from_draft(id: RecordId, created_at: DateTime<Utc>, draft: ExpenseDraft) -> Self {
        Self {
            id,
            amount: draft.amount,
            description: draft.description,
            category: draft.category,
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

    fn apply_patch(&mut self, patch: &ExpensePatch) {
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
    }
}
