use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;

use crate::accounting::expense::Category;
use crate::accounting::period::Period;
use crate::commands::{AddExpense, Command, DeleteExpense, ExportLedger, ListExpenses, ListPeriods, Summarize};
use crate::data::{ExportTarget, DEFAULT_DATA_FILE};

#[derive(Debug, Parser)]
#[command(name = "spendbook", version, about = "Track personal expenses in a CSV ledger")]
pub struct Cli {
    /// CSV file holding the ledger
    #[arg(long, global = true, env = "SPENDBOOK_DATA_FILE", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    #[command(subcommand)]
    pub action: Action,
}

#[derive(Debug, Subcommand)]
pub enum Action {
    /// Record a new expense
    Add {
        /// Amount spent, must be greater than zero
        #[arg(long, allow_negative_numbers = true)]
        amount: Decimal,
        /// food, transport, shopping, entertainment, bills, health, education or other
        #[arg(long)]
        category: Category,
        /// Date of the expense as YYYY-MM-DD, defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete the expense with the given ID as shown by `list`
    Delete { position: usize },
    /// Show every expense, newest first
    List,
    /// Show the months that have expenses, newest first
    Periods,
    /// Summarize one month
    Summary {
        /// Month as YYYY-MM, defaults to the most recent month with expenses
        #[arg(long)]
        period: Option<Period>,
    },
    /// Export the ledger as CSV
    Export {
        /// Destination file, `-` for standard output
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

impl From<Action> for Command {
    fn from(action: Action) -> Self {
        match action {
            Action::Add {
                amount,
                category,
                date,
                description,
            } => Command::AddExpense(AddExpense {
                date: date.unwrap_or_else(|| Local::now().date_naive()),
                amount,
                category,
                description,
            }),
            Action::Delete { position } => Command::DeleteExpense(DeleteExpense { position }),
            Action::List => Command::ListExpenses(ListExpenses),
            Action::Periods => Command::ListPeriods(ListPeriods),
            Action::Summary { period } => Command::Summarize(Summarize { period }),
            Action::Export { output } => Command::ExportLedger(ExportLedger {
                target: ExportTarget::from_arg(output),
            }),
        }
    }
}
