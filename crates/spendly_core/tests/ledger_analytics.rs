use chrono::{DateTime, Utc};
use spendly_core::db::open_db_in_memory;
use spendly_core::{
    category_breakdown, group_by_period, monthly_breakdown, savings_rate, CacheError,
    ExpenseDraft, IncomeDraft, Ledger, MalformedDataPolicy, MemoryKvStore, Period,
    SqliteKvStore,
};

#[test]
fn ledger_open_loads_both_collections() {
    let store = MemoryKvStore::new();
    let mut ledger = Ledger::new(&store, MalformedDataPolicy::Strict);
    assert!(ledger.is_loading());
    assert!(matches!(
        ledger.incomes_mut().add_record(income("Employer", 1.0, "2024-01-01T00:00:00Z")),
        Err(CacheError::NotLoaded { kind: "income" })
    ));

    ledger.load().unwrap();
    assert!(!ledger.is_loading());
    assert!(ledger.expenses().is_empty());
    assert!(ledger.incomes().is_empty());
}

#[test]
fn summary_tracks_balance_and_savings_rate() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);
    let mut ledger = Ledger::open(&store, MalformedDataPolicy::Strict).unwrap();

    ledger
        .incomes_mut()
        .add_record(income("Employer", 2000.0, "2024-01-31T09:00:00Z"))
        .unwrap();
    ledger
        .expenses_mut()
        .add_record(expense("Housing", 800.0, "2024-01-01T09:00:00Z"))
        .unwrap();
    ledger
        .expenses_mut()
        .add_record(expense("Groceries", 200.0, "2024-01-05T09:00:00Z"))
        .unwrap();

    let summary = ledger.summary();
    assert_eq!(summary.total_income, 2000.0);
    assert_eq!(summary.total_expenses, 1000.0);
    assert_eq!(summary.balance, 1000.0);
    assert_eq!(summary.savings_rate, 50.0);

    let reopened = Ledger::open(&store, MalformedDataPolicy::Strict).unwrap();
    assert_eq!(reopened.summary(), summary);
}

#[test]
fn savings_rate_with_no_income_is_zero_not_nan() {
    let store = MemoryKvStore::new();
    let mut ledger = Ledger::open(&store, MalformedDataPolicy::Strict).unwrap();
    ledger
        .expenses_mut()
        .add_record(expense("Travel", 450.0, "2024-04-02T09:00:00Z"))
        .unwrap();

    let summary = ledger.summary();
    assert_eq!(summary.savings_rate, 0.0);
    assert_eq!(summary.balance, -450.0);
    assert_eq!(savings_rate(0.0, 1e9), 0.0);
}

#[test]
fn category_shares_sum_to_one_hundred() {
    let store = MemoryKvStore::new();
    let mut ledger = Ledger::open(&store, MalformedDataPolicy::Strict).unwrap();
    for (category, amount) in [
        ("Food & Dining", 12.3),
        ("Transportation", 45.6),
        ("Food & Dining", 7.7),
        ("Utilities", 99.9),
        ("Gifts", 0.1),
    ] {
        ledger
            .expenses_mut()
            .add_record(expense(category, amount, "2024-05-01T09:00:00Z"))
            .unwrap();
    }

    let breakdown = category_breakdown(ledger.expenses().records());
    assert_eq!(breakdown.len(), 4);
    let share_sum: f64 = breakdown.iter().map(|entry| entry.share_percent).sum();
    assert!((share_sum - 100.0).abs() < 1e-9, "shares summed to {share_sum}");

    let food = breakdown
        .iter()
        .find(|entry| entry.category == "Food & Dining")
        .unwrap();
    assert!((food.total - 20.0).abs() < 1e-9);
    assert_eq!(food.count, 2);
    assert_eq!(breakdown[0].category, "Utilities");
}

#[test]
fn monthly_breakdown_uses_month_index() {
    let store = MemoryKvStore::new();
    let mut ledger = Ledger::open(&store, MalformedDataPolicy::Strict).unwrap();
    ledger
        .expenses_mut()
        .add_record(expense("Shopping", 100.0, "2024-01-20T10:00:00Z"))
        .unwrap();
    ledger
        .expenses_mut()
        .add_record(expense("Shopping", 200.0, "2024-03-03T10:00:00Z"))
        .unwrap();

    let months = monthly_breakdown(ledger.expenses().records());
    assert_eq!(months.len(), 2);
    assert_eq!(months.get(&0), Some(&100.0));
    assert_eq!(months.get(&2), Some(&200.0));
    assert!((1u32..12).filter(|m| *m != 2).all(|m| !months.contains_key(&m)));
}

#[test]
fn monthly_breakdown_collapses_years_into_the_same_bucket() {
    let store = MemoryKvStore::new();
    let mut ledger = Ledger::open(&store, MalformedDataPolicy::Strict).unwrap();
    ledger
        .incomes_mut()
        .add_record(income("Client", 300.0, "2023-07-10T10:00:00Z"))
        .unwrap();
    ledger
        .incomes_mut()
        .add_record(income("Client", 500.0, "2024-07-10T10:00:00Z"))
        .unwrap();

    let months = monthly_breakdown(ledger.incomes().records());
    assert_eq!(months.len(), 1);
    assert_eq!(months.get(&6), Some(&800.0));
}

#[test]
fn group_by_period_buckets_and_orders_most_recent_first() {
    let store = MemoryKvStore::new();
    let mut ledger = Ledger::open(&store, MalformedDataPolicy::Strict).unwrap();
    for (amount, date) in [
        (10.0, "2024-01-08T08:00:00Z"),
        (20.0, "2024-01-10T08:00:00Z"),
        (30.0, "2024-01-10T20:00:00Z"),
        (40.0, "2024-02-02T08:00:00Z"),
    ] {
        ledger
            .expenses_mut()
            .add_record(expense("Groceries", amount, date))
            .unwrap();
    }
    let records = ledger.expenses().records();

    let daily = group_by_period(records, Period::Daily);
    let daily_keys: Vec<_> = daily.iter().map(|group| group.key.as_str()).collect();
    assert_eq!(daily_keys, ["2024-02-02", "2024-01-10", "2024-01-08"]);
    assert_eq!(daily[1].total, 50.0);
    assert_eq!(daily[1].records.len(), 2);

    let weekly = group_by_period(records, Period::Weekly);
    let weekly_summary: Vec<_> = weekly
        .iter()
        .map(|group| (group.key.as_str(), group.total))
        .collect();
    assert_eq!(weekly_summary, [("2024-01-29", 40.0), ("2024-01-08", 60.0)]);

    let monthly = group_by_period(records, Period::Monthly);
    let monthly_summary: Vec<_> = monthly
        .iter()
        .map(|group| (group.key.as_str(), group.total))
        .collect();
    assert_eq!(monthly_summary, [("2024-02", 40.0), ("2024-01", 60.0)]);
}

#[test]
fn form_validation_rejects_incomplete_input_before_the_cache() {
    assert!(ExpenseDraft::from_form("", "Lunch", "Food & Dining", "2024-01-15T12:00:00Z").is_err());
    assert!(ExpenseDraft::from_form("12", " ", "Food & Dining", "2024-01-15T12:00:00Z").is_err());
    assert!(IncomeDraft::from_form("12", "Salary", "", "2024-01-15T12:00:00Z").is_err());

    let draft =
        ExpenseDraft::from_form(" 12.75 ", " Lunch ", "Food & Dining", "2024-01-15T12:00:00Z")
            .unwrap();
    assert_eq!(draft.amount, 12.75);
    assert_eq!(draft.description, "Lunch");
}

fn expense(category: &str, amount: f64, date: &str) -> ExpenseDraft {
    ExpenseDraft {
        amount,
        description: format!("{category} purchase"),
        category: category.to_string(),
        date: utc(date),
    }
}

fn income(source: &str, amount: f64, date: &str) -> IncomeDraft {
    IncomeDraft {
        amount,
        source: source.to_string(),
        description: format!("{source} payment"),
        date: utc(date),
    }
}

fn utc(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .unwrap()
        .with_timezone(&Utc)
}
