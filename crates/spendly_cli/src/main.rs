//! Command-line probe over Spendly core.
//!
//! # Responsibility
//! - Verify `spendly_core` linkage and inspect a ledger database locally.
//! - Keep output deterministic and line-oriented for scripting.

use chrono::Utc;
use clap::{Parser, Subcommand};
use spendly_core::db::open_db;
use spendly_core::{
    category_breakdown, find_category, group_by_period, init_logging_from_config,
    monthly_breakdown, Expense, ExpenseDraft, Income, IncomeDraft, Ledger, LedgerConfig, Period,
    SqliteKvStore,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Parser)]
#[command(name = "spendly", version, about = "Inspect and edit a Spendly ledger")]
struct Cli {
    /// Ledger database path. Defaults to `SPENDLY_DB_PATH` or a temp file.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print core linkage info.
    Ping,
    /// Income, expenses, balance and savings rate.
    Summary,
    /// List expenses, most recent first.
    Expenses,
    /// List income entries, most recent first.
    Incomes,
    AddExpense {
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        category: String,
        /// RFC 3339 timestamp; defaults to now.
        #[arg(long)]
        date: Option<String>,
    },
    AddIncome {
        #[arg(long, allow_hyphen_values = true)]
        amount: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        source: String,
        #[arg(long)]
        date: Option<String>,
    },
    DeleteExpense {
        id: String,
    },
    DeleteIncome {
        id: String,
    },
    /// Expense totals per category.
    Categories,
    /// Month-of-year totals (years are merged).
    Monthly,
    /// Expenses grouped by period.
    Grouped {
        #[arg(long, default_value = "daily")]
        period: Period,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Command::Ping = cli.command {
        println!("spendly_core ping={}", spendly_core::ping());
        println!("spendly_core version={}", spendly_core::core_version());
        return Ok(());
    }

    let mut config = LedgerConfig::from_env()?;
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    init_logging_from_config(&config)?;

    let conn = open_db(&config.db_path)?;
    let store = SqliteKvStore::new(&conn);
    let mut ledger = Ledger::open(&store, config.malformed_policy)?;

    match cli.command {
        Command::Ping => {}
        Command::Summary => {
            let summary = ledger.summary();
            println!("income={:.2}", summary.total_income);
            println!("expenses={:.2}", summary.total_expenses);
            println!("balance={:.2}", summary.balance);
            println!("savings_rate={:.1}%", summary.savings_rate);
        }
        Command::Expenses => ledger.expenses().records().iter().for_each(print_expense),
        Command::Incomes => ledger.incomes().records().iter().for_each(print_income),
        Command::AddExpense {
            amount,
            description,
            category,
            date,
        } => {
            let date = date.unwrap_or_else(now_rfc3339);
            let draft = ExpenseDraft::from_form(&amount, &description, &category, &date)?;
            let expense = ledger.expenses_mut().add_record(draft)?;
            println!("added expense id={}", expense.id);
        }
        Command::AddIncome {
            amount,
            description,
            source,
            date,
        } => {
            let date = date.unwrap_or_else(now_rfc3339);
            let draft = IncomeDraft::from_form(&amount, &description, &source, &date)?;
            let income = ledger.incomes_mut().add_record(draft)?;
            println!("added income id={}", income.id);
        }
        Command::DeleteExpense { id } => match ledger.expenses_mut().delete_record(&id)? {
            Some(_) => println!("deleted expense id={id}"),
            None => println!("no expense with id={id}"),
        },
        Command::DeleteIncome { id } => match ledger.incomes_mut().delete_record(&id)? {
            Some(_) => println!("deleted income id={id}"),
            None => println!("no income with id={id}"),
        },
        Command::Categories => {
            for entry in category_breakdown(ledger.expenses().records()) {
                let emoji = find_category(&entry.category).map_or("-", |category| category.emoji);
                println!(
                    "{emoji}\t{}\t{:.2}\t{:.1}%\t{}",
                    entry.category,
                    entry.total,
                    entry.share_percent,
                    entry.count
                );
            }
        }
        Command::Monthly => {
            let expenses = monthly_breakdown(ledger.expenses().records());
            let incomes = monthly_breakdown(ledger.incomes().records());
            for (index, name) in MONTH_NAMES.iter().enumerate() {
                let month = index as u32;
                let spent = expenses.get(&month).copied().unwrap_or(0.0);
                let earned = incomes.get(&month).copied().unwrap_or(0.0);
                if spent != 0.0 || earned != 0.0 {
                    println!("{name}\tincome={earned:.2}\texpenses={spent:.2}");
                }
            }
        }
        Command::Grouped { period } => {
            for group in group_by_period(ledger.expenses().records(), period) {
                println!("{}\ttotal={:.2}", group.key, group.total);
                group
                    .records
                    .into_iter()
                    .for_each(|expense| print!("  {}", expense_line(expense)));
            }
        }
    }
    Ok(())
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

fn expense_line(expense: &Expense) -> String {
    format!(
        "{}\t{}\t{:.2}\t{}\t{}\n",
        expense.id,
        expense.date.format("%Y-%m-%d %H:%M"),
        expense.amount,
        expense.category,
        expense.description
    )
}

fn print_expense(expense: &Expense) {
    print!("{}", expense_line(expense));
}

fn print_income(income: &Income) {
    println!(
        "{}\t{}\t{:.2}\t{}\t{}",
        income.id,
        income.date.format("%Y-%m-%d %H:%M"),
        income.amount,
        income.source,
        income.description
    );
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use clap::{CommandFactory, Parser};
    use spendly_core::Period;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn grouped_accepts_period_names() {
        let cli = Cli::try_parse_from(["spendly", "grouped", "--period", "weekly"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Grouped {
                period: Period::Weekly
            }
        ));
        assert!(Cli::try_parse_from(["spendly", "grouped", "--period", "yearly"]).is_err());
    }

    #[test]
    fn add_expense_accepts_negative_amounts_and_global_db() {
        let cli = Cli::try_parse_from([
            "spendly",
            "add-expense",
            "--amount",
            "-12.5",
            "--description",
            "Refund",
            "--category",
            "Shopping",
            "--db",
            "/tmp/ledger.sqlite3",
        ])
        .unwrap();
        assert_eq!(
            cli.db.as_deref(),
            Some(std::path::Path::new("/tmp/ledger.sqlite3"))
        );
        assert!(matches!(cli.command, Command::AddExpense { ref amount, .. } if amount == "-12.5"));
    }
}
