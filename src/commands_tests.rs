use std::fs;

use anyhow::{bail, Result};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::{tempdir, TempDir};

use crate::accounting::expense::{Category, ExpenseRecord, MAX_AMOUNT};
use crate::accounting::ledger::Ledger;
use crate::accounting::period::Period;
use crate::accounting::ValidationError;
use crate::commands::*;
use crate::data::{ExportTarget, LedgerStore};
use crate::report;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn add(on: NaiveDate, amount: Decimal, category: Category) -> Command {
    Command::AddExpense(AddExpense {
        date: on,
        amount,
        category,
        description: None,
    })
}

fn fixture() -> Result<(TempDir, LedgerStore)> {
    let dir = tempdir()?;
    let store = LedgerStore::new(dir.path().join("data_pengeluaran.csv"));
    Ok((dir, store))
}

fn seeded(store: &LedgerStore) -> Result<Ledger> {
    let mut ledger = store.load()?;
    add(date(2024, 1, 5), dec!(100), Category::FoodAndDrink).handle(&mut ledger, store)?;
    add(date(2024, 1, 5), dec!(50), Category::FoodAndDrink).handle(&mut ledger, store)?;
    add(date(2024, 1, 10), dec!(200), Category::Transport).handle(&mut ledger, store)?;
    Ok(ledger)
}

#[test]
fn test_add_persists_immediately() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = store.load()?;

    let command = Command::AddExpense(AddExpense {
        date: date(2024, 3, 14),
        amount: dec!(45000),
        category: Category::Entertainment,
        description: Some("bioskop".into()),
    });
    let outcome = command.handle(&mut ledger, &store)?;

    match outcome {
        Outcome::Added { position, record } => {
            assert_eq!(position, 1);
            assert_eq!(record.description().as_deref(), Some("bioskop"));
        },
        other => bail!("unexpected outcome {:?}", other),
    }
    assert_eq!(store.load()?, ledger);

    Ok(())
}

#[test]
fn test_add_rejects_non_positive_amount() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;
    let saved = fs::read_to_string(store.path())?;

    for amount in [dec!(0), dec!(-10)] {
        let err = match add(date(2024, 1, 11), amount, Category::Bills).handle(&mut ledger, &store) {
            Ok(outcome) => bail!("amount {} should be rejected, got {:?}", amount, outcome),
            Err(err) => err,
        };
        assert_eq!(err.downcast_ref::<ValidationError>(), Some(&ValidationError::InvalidAmount));
    }

    assert_eq!(ledger.len(), 3);
    assert_eq!(fs::read_to_string(store.path())?, saved);

    Ok(())
}

#[test]
fn test_rejected_add_on_fresh_store_writes_nothing() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = store.load()?;

    assert!(add(date(2024, 1, 1), dec!(0), Category::Other).handle(&mut ledger, &store).is_err());
    assert!(!store.path().exists());

    Ok(())
}

#[test]
fn test_delete_removes_second_inserted() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;

    let outcome = Command::DeleteExpense(DeleteExpense { position: 2 }).handle(&mut ledger, &store)?;

    match outcome {
        Outcome::Deleted { position, record } => {
            assert_eq!(position, 2);
            assert_eq!(record.amount(), dec!(50));
        },
        other => bail!("unexpected outcome {:?}", other),
    }
    let amounts: Vec<Decimal> = store.load()?.iter().map(|record| record.amount()).collect();
    assert_eq!(amounts, vec![dec!(100), dec!(200)]);

    Ok(())
}

#[test]
fn test_delete_out_of_range_keeps_ledger() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;
    let before = ledger.clone();

    for position in [0, 4] {
        let result = Command::DeleteExpense(DeleteExpense { position }).handle(&mut ledger, &store);
        let err = match result {
            Ok(outcome) => bail!("position {} should be rejected, got {:?}", position, outcome),
            Err(err) => err,
        };
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::PositionOutOfRange { position, len: 3 })
        );
    }

    assert_eq!(ledger, before);
    assert_eq!(store.load()?, before);

    Ok(())
}

#[test]
fn test_list_is_newest_first_with_insertion_ids() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;

    let ids = match Command::ListExpenses(ListExpenses).handle(&mut ledger, &store)? {
        Outcome::Listing(rows) => rows.into_iter().map(|(position, _)| position).collect::<Vec<_>>(),
        other => bail!("unexpected outcome {:?}", other),
    };
    assert_eq!(ids, vec![3, 1, 2]);

    Ok(())
}

#[test]
fn test_summary_defaults_to_latest_period() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;
    add(date(2023, 12, 24), dec!(999), Category::Shopping).handle(&mut ledger, &store)?;

    let summary = match Command::Summarize(Summarize { period: None }).handle(&mut ledger, &store)? {
        Outcome::Analysis(summary) => summary,
        other => bail!("unexpected outcome {:?}", other),
    };

    assert_eq!(summary.period(), Period::new(2024, 1).unwrap());
    assert_eq!(summary.total(), dec!(350));
    assert_eq!(summary.daily_average(), dec!(175));
    assert_eq!(summary.top_category(), Some((Category::Transport, dec!(200))));

    Ok(())
}

#[test]
fn test_summary_of_requested_period() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;
    add(date(2023, 12, 24), dec!(999), Category::Shopping).handle(&mut ledger, &store)?;

    let command = Command::Summarize(Summarize {
        period: Period::new(2023, 12),
    });
    let summary = match command.handle(&mut ledger, &store)? {
        Outcome::Analysis(summary) => summary,
        other => bail!("unexpected outcome {:?}", other),
    };

    assert_eq!(summary.total(), dec!(999));
    assert_eq!(summary.top_category(), Some((Category::Shopping, dec!(999))));

    Ok(())
}

#[test]
fn test_summary_of_empty_ledger_is_no_data() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = store.load()?;

    let outcome = Command::Summarize(Summarize { period: None }).handle(&mut ledger, &store)?;
    assert_eq!(outcome, Outcome::NoData);

    let outcome = Command::ListPeriods(ListPeriods).handle(&mut ledger, &store)?;
    assert_eq!(outcome, Outcome::Periods(Vec::new()));

    Ok(())
}

#[test]
fn test_export_writes_full_ledger() -> Result<()> {
    let (dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;
    let target = ExportTarget::File(dir.path().join("laporan_pengeluaran.csv"));

    let outcome = Command::ExportLedger(ExportLedger { target: target.clone() }).handle(&mut ledger, &store)?;

    assert_eq!(outcome, Outcome::Exported { target, rows: 3 });
    assert_eq!(
        fs::read_to_string(dir.path().join("laporan_pengeluaran.csv"))?,
        fs::read_to_string(store.path())?
    );

    Ok(())
}

#[test]
fn test_add_rejects_amount_above_limit() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = seeded(&store)?;
    let huge = Decimal::from_i128_with_scale(1_000_000_000_000_000_000_000_000_000, 0);

    let err = match add(date(2024, 1, 5), huge, Category::Bills).handle(&mut ledger, &store) {
        Ok(outcome) => bail!("amount {} should be rejected, got {:?}", huge, outcome),
        Err(err) => err,
    };

    assert_eq!(
        err.downcast_ref::<ValidationError>(),
        Some(&ValidationError::AmountTooLarge { max: MAX_AMOUNT })
    );
    assert_eq!(store.load()?.len(), 3);

    Ok(())
}

#[test]
fn test_summary_renders_maximal_amounts() -> Result<()> {
    let (_dir, store) = fixture()?;
    let mut ledger = store.load()?;
    add(date(2024, 1, 5), MAX_AMOUNT, Category::Bills).handle(&mut ledger, &store)?;
    add(date(2024, 1, 6), MAX_AMOUNT, Category::Bills).handle(&mut ledger, &store)?;
    add(date(2024, 1, 6), dec!(0.01), Category::Other).handle(&mut ledger, &store)?;

    let outcome = Command::Summarize(Summarize { period: None }).handle(&mut ledger, &store)?;
    let mut out = Vec::new();
    report::render(&outcome, &mut out)?;

    let text = String::from_utf8(out)?;
    assert!(text.contains("Rp 2,000,000,000,000,000.01"));
    assert!(text.contains("Rp 2,000,000,000,000,000.00"));

    Ok(())
}

#[test]
fn test_failed_save_leaves_ledger_untouched() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("data_pengeluaran.csv");
    fs::create_dir(&path)?;
    let store = LedgerStore::new(&path);

    let mut ledger = Ledger::new();
    ledger.append(ExpenseRecord::new(date(2024, 1, 5), dec!(10), Category::Other, None)?);
    let before = ledger.clone();

    assert!(add(date(2024, 1, 6), dec!(20), Category::Bills).handle(&mut ledger, &store).is_err());
    assert_eq!(ledger, before);

    assert!(Command::DeleteExpense(DeleteExpense { position: 1 }).handle(&mut ledger, &store).is_err());
    assert_eq!(ledger, before);

    Ok(())
}
