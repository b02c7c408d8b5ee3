//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose stable, use-case-level ledger functions to Dart via FRB.
//! - Keep error semantics simple: envelopes with `ok` + `message`.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Every call opens the configured database, loads a ledger session,
//!   performs one use case and drops the session.
//! - Form validation failures skip the operation and report `ok=false`.

use log::warn;
use spendly_core::db::open_db;
use spendly_core::{
    category_breakdown as category_breakdown_inner, core_version as core_version_inner,
    group_by_period, init_logging as init_logging_inner, monthly_breakdown as monthly_inner,
    ping as ping_inner, Expense, ExpenseDraft, ExpensePatch, Income, IncomeDraft, IncomePatch,
    Ledger, LedgerConfig, Period, SqliteKvStore, DEFAULT_EXPENSE_CATEGORIES,
};
use std::collections::BTreeMap;
use std::sync::OnceLock;

static LEDGER_CONFIG: OnceLock<Result<LedgerConfig, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir`.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Expense row for list views.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseItem {
    pub id: String,
    pub amount: f64,
    pub description: String,
    pub category: String,
    /// RFC 3339, UTC.
    pub date: String,
    pub created_at: String,
}

/// Income row for list views.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeItem {
    pub id: String,
    pub amount: f64,
    pub source: String,
    pub description: String,
    pub date: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseListResponse {
    pub ok: bool,
    /// Most recently added first.
    pub items: Vec<ExpenseItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeListResponse {
    pub ok: bool,
    pub items: Vec<IncomeItem>,
    pub message: String,
}

/// Generic action response envelope for add/update/delete flows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the operation ran. Unknown ids still count as success.
    pub ok: bool,
    /// Affected record ID; `None` when nothing matched or on failure.
    pub record_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Option<String>) -> Self {
        Self {
            ok: true,
            record_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Summary card figures.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryResponse {
    pub ok: bool,
    pub total_income: f64,
    pub total_expenses: f64,
    pub balance: f64,
    pub savings_rate: f64,
    /// Savings rate clamped to `[0, 100]`.
    pub savings_progress: f64,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotalItem {
    pub category: String,
    pub total: f64,
    pub share_percent: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBreakdownResponse {
    pub ok: bool,
    pub items: Vec<CategoryTotalItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthTotalItem {
    /// `0` = January. Years are not distinguished.
    pub month_index: u32,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBreakdownResponse {
    pub ok: bool,
    pub expenses: Vec<MonthTotalItem>,
    pub incomes: Vec<MonthTotalItem>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseGroupItem {
    pub key: String,
    pub total: f64,
    pub items: Vec<ExpenseItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedExpensesResponse {
    pub ok: bool,
    /// Effective period label (`daily|weekly|monthly`).
    pub period: String,
    pub groups: Vec<ExpenseGroupItem>,
    pub message: String,
}

/// Built-in category picker entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInfo {
    pub id: String,
    pub name: String,
    pub emoji: String,
}

/// Lists expenses, most recent first.
#[flutter_rust_bridge::frb(sync)]
pub fn expense_list() -> ExpenseListResponse {
    match with_ledger(|ledger| {
        Ok(ledger
            .expenses()
            .records()
            .iter()
            .map(to_expense_item)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => ExpenseListResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Err(err) => ExpenseListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("expense_list failed: {err}"),
        },
    }
}

/// Adds an expense from raw form fields.
///
/// # FFI contract
/// - Blank amount/description/category skips the add (`ok=false`).
/// - `date` must be RFC 3339.
#[flutter_rust_bridge::frb(sync)]
pub fn expense_add(
    amount: String,
    description: String,
    category: String,
    date: String,
) -> ActionResponse {
    let draft = match ExpenseDraft::from_form(&amount, &description, &category, &date) {
        Ok(draft) => draft,
        Err(err) => return ActionResponse::failure(format!("expense_add skipped: {err}")),
    };
    match with_ledger(|ledger| {
        ledger
            .expenses_mut()
            .add_record(draft)
            .map_err(|err| err.to_string())
    }) {
        Ok(expense) => ActionResponse::success("Expense added.", Some(expense.id)),
        Err(err) => ActionResponse::failure(format!("expense_add failed: {err}")),
    }
}

/// Replaces the editable fields of an expense.
#[flutter_rust_bridge::frb(sync)]
pub fn expense_update(
    id: String,
    amount: String,
    description: String,
    category: String,
    date: String,
) -> ActionResponse {
    let patch = match ExpensePatch::from_form(&amount, &description, &category, &date) {
        Ok(patch) => patch,
        Err(err) => return ActionResponse::failure(format!("expense_update skipped: {err}")),
    };
    match with_ledger(|ledger| {
        ledger
            .expenses_mut()
            .update_record(id.trim(), patch)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(expense)) => ActionResponse::success("Expense updated.", Some(expense.id)),
        Ok(None) => ActionResponse::success("No matching expense.", None),
        Err(err) => ActionResponse::failure(format!("expense_update failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn expense_delete(id: String) -> ActionResponse {
    match with_ledger(|ledger| {
        ledger
            .expenses_mut()
            .delete_record(id.trim())
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(expense)) => ActionResponse::success("Expense deleted.", Some(expense.id)),
        Ok(None) => ActionResponse::success("No matching expense.", None),
        Err(err) => ActionResponse::failure(format!("expense_delete failed: {err}")),
    }
}

/// Lists income entries, most recent first.
#[flutter_rust_bridge::frb(sync)]
pub fn income_list() -> IncomeListResponse {
    match with_ledger(|ledger| {
        Ok(ledger
            .incomes()
            .records()
            .iter()
            .map(to_income_item)
            .collect::<Vec<_>>())
    }) {
        Ok(items) => IncomeListResponse {
            ok: true,
            items,
            message: String::new(),
        },
        Err(err) => IncomeListResponse {
            ok: false,
            items: Vec::new(),
            message: format!("income_list failed: {err}"),
        },
    }
}

/// Adds an income entry from raw form fields.
#[flutter_rust_bridge::frb(sync)]
pub fn income_add(
    amount: String,
    description: String,
    source: String,
    date: String,
) -> ActionResponse {
    let draft = match IncomeDraft::from_form(&amount, &description, &source, &date) {
        Ok(draft) => draft,
        Err(err) => return ActionResponse::failure(format!("income_add skipped: {err}")),
    };
    match with_ledger(|ledger| {
        ledger
            .incomes_mut()
            .add_record(draft)
            .map_err(|err| err.to_string())
    }) {
        Ok(income) => ActionResponse::success("Income added.", Some(income.id)),
        Err(err) => ActionResponse::failure(format!("income_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn income_update(
    id: String,
    amount: String,
    description: String,
    source: String,
    date: String,
) -> ActionResponse {
    let patch = match IncomePatch::from_form(&amount, &description, &source, &date) {
        Ok(patch) => patch,
        Err(err) => return ActionResponse::failure(format!("income_update skipped: {err}")),
    };
    match with_ledger(|ledger| {
        ledger
            .incomes_mut()
            .update_record(id.trim(), patch)
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(income)) => ActionResponse::success("Income updated.", Some(income.id)),
        Ok(None) => ActionResponse::success("No matching income.", None),
        Err(err) => ActionResponse::failure(format!("income_update failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn income_delete(id: String) -> ActionResponse {
    match with_ledger(|ledger| {
        ledger
            .incomes_mut()
            .delete_record(id.trim())
            .map_err(|err| err.to_string())
    }) {
        Ok(Some(income)) => ActionResponse::success("Income deleted.", Some(income.id)),
        Ok(None) => ActionResponse::success("No matching income.", None),
        Err(err) => ActionResponse::failure(format!("income_delete failed: {err}")),
    }
}

/// Balance and savings-rate summary over both collections.
#[flutter_rust_bridge::frb(sync)]
pub fn financial_summary() -> SummaryResponse {
    match with_ledger(|ledger| Ok(ledger.summary())) {
        Ok(summary) => SummaryResponse {
            ok: true,
            total_income: summary.total_income,
            total_expenses: summary.total_expenses,
            balance: summary.balance,
            savings_rate: summary.savings_rate,
            savings_progress: summary.savings_progress(),
            message: String::new(),
        },
        Err(err) => SummaryResponse {
            ok: false,
            total_income: 0.0,
            total_expenses: 0.0,
            balance: 0.0,
            savings_rate: 0.0,
            savings_progress: 0.0,
            message: format!("financial_summary failed: {err}"),
        },
    }
}

/// Expense totals per category, largest first.
#[flutter_rust_bridge::frb(sync)]
pub fn category_breakdown() -> CategoryBreakdownResponse {
    match with_ledger(|ledger| Ok(category_breakdown_inner(ledger.expenses().records()))) {
        Ok(breakdown) => CategoryBreakdownResponse {
            ok: true,
            items: breakdown
                .into_iter()
                .map(|entry| CategoryTotalItem {
                    category: entry.category,
                    total: entry.total,
                    share_percent: entry.share_percent,
                    count: u32::try_from(entry.count).unwrap_or(u32::MAX),
                })
                .collect(),
            message: String::new(),
        },
        Err(err) => CategoryBreakdownResponse {
            ok: false,
            items: Vec::new(),
            message: format!("category_breakdown failed: {err}"),
        },
    }
}

/// Month-of-year totals for expenses and income.
#[flutter_rust_bridge::frb(sync)]
pub fn monthly_breakdown() -> MonthlyBreakdownResponse {
    match with_ledger(|ledger| {
        Ok((
            monthly_inner(ledger.expenses().records()),
            monthly_inner(ledger.incomes().records()),
        ))
    }) {
        Ok((expenses, incomes)) => MonthlyBreakdownResponse {
            ok: true,
            expenses: to_month_items(expenses),
            incomes: to_month_items(incomes),
            message: String::new(),
        },
        Err(err) => MonthlyBreakdownResponse {
            ok: false,
            expenses: Vec::new(),
            incomes: Vec::new(),
            message: format!("monthly_breakdown failed: {err}"),
        },
    }
}

/// Expenses grouped by `daily|weekly|monthly`; unknown values fall back to daily.
#[flutter_rust_bridge::frb(sync)]
pub fn grouped_expenses(period: String) -> GroupedExpensesResponse {
    let period = period.parse::<Period>().unwrap_or(Period::Daily);
    match with_ledger(|ledger| {
        Ok(group_by_period(ledger.expenses().records(), period)
            .into_iter()
            .map(|group| ExpenseGroupItem {
                key: group.key,
                total: group.total,
                items: group.records.into_iter().map(to_expense_item).collect(),
            })
            .collect::<Vec<_>>())
    }) {
        Ok(groups) => GroupedExpensesResponse {
            ok: true,
            period: period.as_str().to_string(),
            groups,
            message: String::new(),
        },
        Err(err) => GroupedExpensesResponse {
            ok: false,
            period: period.as_str().to_string(),
            groups: Vec::new(),
            message: format!("grouped_expenses failed: {err}"),
        },
    }
}

/// Built-in category catalogue for the picker.
#[flutter_rust_bridge::frb(sync)]
pub fn expense_categories() -> Vec<CategoryInfo> {
    DEFAULT_EXPENSE_CATEGORIES
        .iter()
        .map(|category| CategoryInfo {
            id: category.id.to_string(),
            name: category.name.to_string(),
            emoji: category.emoji.to_string(),
        })
        .collect()
}

fn resolve_config() -> Result<LedgerConfig, String> {
    LEDGER_CONFIG
        .get_or_init(|| LedgerConfig::from_env().map_err(|err| err.to_string()))
        .clone()
}

fn with_ledger<T>(
    f: impl FnOnce(&mut Ledger<'_, SqliteKvStore<'_>>) -> Result<T, String>,
) -> Result<T, String> {
    let config = resolve_config()?;
    let conn = open_db(&config.db_path).map_err(|err| {
        warn!("event=ffi_session module=ffi status=error stage=open_db error={err}");
        format!("ledger DB open failed: {err}")
    })?;
    let store = SqliteKvStore::new(&conn);
    let mut ledger = Ledger::open(&store, config.malformed_policy).map_err(|err| {
        warn!("event=ffi_session module=ffi status=error stage=load error={err}");
        format!("ledger load failed: {err}")
    })?;
    f(&mut ledger)
}

fn to_expense_item(expense: &Expense) -> ExpenseItem {
    ExpenseItem {
        id: expense.id.clone(),
        amount: expense.amount,
        description: expense.description.clone(),
        category: expense.category.clone(),
        date: expense.date.to_rfc3339(),
        created_at: expense.created_at.to_rfc3339(),
    }
}

fn to_income_item(income: &Income) -> IncomeItem {
    IncomeItem {
        id: income.id.clone(),
        amount: income.amount,
        source: income.source.clone(),
        description: income.description.clone(),
        date: income.date.to_rfc3339(),
        created_at: income.created_at.to_rfc3339(),
    }
}

fn to_month_items(months: BTreeMap<u32, f64>) -> Vec<MonthTotalItem> {
    months
        .into_iter()
        .map(|(month_index, total)| MonthTotalItem { month_index, total })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        core_version, expense_add, expense_categories, expense_delete, expense_list,
        expense_update, financial_summary, grouped_expenses, income_add, income_delete,
        income_list, init_logging, ping,
    };
    use std::sync::{Mutex, MutexGuard};
    use std::time::{SystemTime, UNIX_EPOCH};

    // Calls share one database file and rewrite whole collections.
    static DB_LOCK: Mutex<()> = Mutex::new(());

    fn lock_db() -> MutexGuard<'static, ()> {
        DB_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "tmp/logs".to_string());
        assert!(!error.is_empty());
    }

    #[test]
    fn expense_add_update_delete_roundtrip() {
        let _guard = lock_db();
        let token = unique_token("expense");

        let created = expense_add(
            "50".to_string(),
            token.clone(),
            "Food & Dining".to_string(),
            "2024-01-15T12:00:00Z".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        let id = created.record_id.expect("add should return record_id");

        let listed = expense_list();
        assert!(listed.ok, "{}", listed.message);
        assert_eq!(listed.items[0].id, id);

        let updated = expense_update(
            id.clone(),
            "75".to_string(),
            token.clone(),
            "Food & Dining".to_string(),
            "2024-01-15T12:00:00Z".to_string(),
        );
        assert!(updated.ok, "{}", updated.message);
        let item = expense_list()
            .items
            .into_iter()
            .find(|item| item.id == id)
            .expect("updated expense should be listed");
        assert_eq!(item.amount, 75.0);
        assert_eq!(item.description, token);

        let deleted = expense_delete(id.clone());
        assert_eq!(deleted.record_id.as_deref(), Some(id.as_str()));
        assert!(expense_list().items.iter().all(|item| item.id != id));
    }

    #[test]
    fn expense_add_skips_incomplete_form() {
        let response = expense_add(
            "12".to_string(),
            "  ".to_string(),
            "Shopping".to_string(),
            "2024-01-15T12:00:00Z".to_string(),
        );
        assert!(!response.ok);
        assert!(response.message.contains("skipped"));
        assert!(response.record_id.is_none());
    }

    #[test]
    fn unknown_ids_are_silent_noops() {
        let _guard = lock_db();
        let missing = unique_token("missing");

        let deleted = expense_delete(missing.clone());
        assert!(deleted.ok, "{}", deleted.message);
        assert!(deleted.record_id.is_none());

        let removed_income = income_delete(missing);
        assert!(removed_income.ok, "{}", removed_income.message);
        assert!(removed_income.record_id.is_none());
    }

    #[test]
    fn income_changes_summary_totals() {
        let _guard = lock_db();
        let before = financial_summary();
        assert!(before.ok, "{}", before.message);

        let created = income_add(
            "100".to_string(),
            "Side project".to_string(),
            unique_token("client"),
            "2024-02-01T08:00:00Z".to_string(),
        );
        assert!(created.ok, "{}", created.message);
        let id = created.record_id.expect("add should return record_id");
        assert!(income_list().items.iter().any(|item| item.id == id));

        let after = financial_summary();
        assert!((after.total_income - before.total_income - 100.0).abs() < 1e-6);
        assert!(after.savings_progress >= 0.0 && after.savings_progress <= 100.0);

        income_delete(id);
    }

    #[test]
    fn grouped_expenses_normalizes_period() {
        let _guard = lock_db();
        assert_eq!(grouped_expenses("WEEKLY".to_string()).period, "weekly");
        assert_eq!(grouped_expenses("fortnightly".to_string()).period, "daily");
    }

    #[test]
    fn expense_categories_exposes_catalogue() {
        let categories = expense_categories();
        assert_eq!(categories.len(), 12);
        assert_eq!(categories[0].name, "Food & Dining");
    }

    fn unique_token(prefix: &str) -> String {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("time went backwards")
            .as_nanos();
        format!("{prefix}-{nanos}")
    }
}
