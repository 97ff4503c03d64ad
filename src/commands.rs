use anyhow::Result;
use chrono::NaiveDate;
use enum_dispatch::enum_dispatch;
use log::{debug, info};
use rust_decimal::Decimal;

use crate::accounting::analytics::{self, Summary};
use crate::accounting::expense::{Category, ExpenseRecord};
use crate::accounting::ledger::Ledger;
use crate::accounting::period::Period;
use crate::data::{ExportTarget, LedgerStore};

/// What a handler hands back for display.
#[derive(Debug, PartialEq)]
pub enum Outcome {
    Added { position: usize, record: ExpenseRecord },
    Deleted { position: usize, record: ExpenseRecord },
    Listing(Vec<(usize, ExpenseRecord)>),
    Periods(Vec<Period>),
    Analysis(Summary),
    Exported { target: ExportTarget, rows: usize },
    /// The ledger holds no records, so there is nothing to analyze.
    NoData,
}

/// One user action against the ledger. Mutating handlers persist the ledger
/// before returning; a failed handler leaves both the ledger and the file
/// untouched.
#[enum_dispatch]
pub trait Handler {
    fn handle(&self, ledger: &mut Ledger, store: &LedgerStore) -> Result<Outcome>;
}

#[enum_dispatch(Handler)]
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    AddExpense,
    DeleteExpense,
    ListExpenses,
    ListPeriods,
    Summarize,
    ExportLedger,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddExpense {
    pub date: NaiveDate,
    pub amount: Decimal,
    pub category: Category,
    pub description: Option<String>,
}

impl Handler for AddExpense {
    fn handle(&self, ledger: &mut Ledger, store: &LedgerStore) -> Result<Outcome> {
        let record = ExpenseRecord::new(self.date, self.amount, self.category, self.description.clone())?;

        let mut updated = ledger.clone();
        let position = updated.append(record.clone());
        store.save(&updated)?;
        *ledger = updated;
        info!("added expense #{} of {} in {}", position, record.amount(), record.category());

        Ok(Outcome::Added { position, record })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeleteExpense {
    pub position: usize,
}

impl Handler for DeleteExpense {
    fn handle(&self, ledger: &mut Ledger, store: &LedgerStore) -> Result<Outcome> {
        let mut updated = ledger.clone();
        let record = updated.remove_at(self.position)?;
        store.save(&updated)?;
        *ledger = updated;
        info!("deleted expense #{}", self.position);

        Ok(Outcome::Deleted {
            position: self.position,
            record,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListExpenses;

impl Handler for ListExpenses {
    fn handle(&self, ledger: &mut Ledger, _store: &LedgerStore) -> Result<Outcome> {
        let rows = ledger
            .display_order()
            .into_iter()
            .map(|(position, record)| (position, record.clone()))
            .collect();

        Ok(Outcome::Listing(rows))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListPeriods;

impl Handler for ListPeriods {
    fn handle(&self, ledger: &mut Ledger, _store: &LedgerStore) -> Result<Outcome> {
        Ok(Outcome::Periods(analytics::available_periods(ledger)))
    }
}

/// Analyzes `period`, or the most recent period with records when none is given.
#[derive(Debug, Clone, PartialEq)]
pub struct Summarize {
    pub period: Option<Period>,
}

impl Handler for Summarize {
    fn handle(&self, ledger: &mut Ledger, _store: &LedgerStore) -> Result<Outcome> {
        let Some(latest) = analytics::available_periods(ledger).first().copied() else {
            debug!("ledger is empty, skipping analysis");
            return Ok(Outcome::NoData);
        };

        let period = self.period.unwrap_or(latest);
        Ok(Outcome::Analysis(analytics::analyze(ledger, period)))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportLedger {
    pub target: ExportTarget,
}

impl Handler for ExportLedger {
    fn handle(&self, ledger: &mut Ledger, store: &LedgerStore) -> Result<Outcome> {
        let rows = store.export(ledger, &self.target)?;

        Ok(Outcome::Exported {
            target: self.target.clone(),
            rows,
        })
    }
}
