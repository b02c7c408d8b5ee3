use chrono::{TimeZone, Utc};
use spendly_core::db::{open_db, open_db_in_memory};
use spendly_core::{
    ExpenseDraft, ExpenseStorage, IncomeDraft, IncomeStorage, KeyValueStore, SqliteKvStore,
};

#[test]
fn sqlite_store_reads_missing_key_as_none() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    assert_eq!(store.get_string("expenses").unwrap(), None);
}

#[test]
fn sqlite_store_upserts_values() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteKvStore::new(&conn);

    store.set("expenses", "[]").unwrap();
    store.set("expenses", "[{}]").unwrap();

    assert_eq!(store.get_string("expenses").unwrap().as_deref(), Some("[{}]"));
    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_entries;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}

#[test]
fn collections_survive_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ledger.sqlite3");
    let at = Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap();

    let (expense_id, income_id) = {
        let conn = open_db(&path).unwrap();
        let store = SqliteKvStore::new(&conn);
        let expense = ExpenseStorage::new(&store)
            .add(ExpenseDraft {
                amount: 42.0,
                description: "Train pass".to_string(),
                category: "Transportation".to_string(),
                date: at,
            })
            .unwrap();
        let income = IncomeStorage::new(&store)
            .add(IncomeDraft {
                amount: 1500.0,
                source: "Employer".to_string(),
                description: "June salary".to_string(),
                date: at,
            })
            .unwrap();
        (expense.id, income.id)
    };

    let conn = open_db(&path).unwrap();
    let store = SqliteKvStore::new(&conn);
    let expenses = ExpenseStorage::new(&store).get_all().unwrap();
    let incomes = IncomeStorage::new(&store).get_all().unwrap();

    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].id, expense_id);
    assert_eq!(expenses[0].date, at);
    assert_eq!(incomes.len(), 1);
    assert_eq!(incomes[0].id, income_id);
    assert_eq!(incomes[0].source, "Employer");
}
