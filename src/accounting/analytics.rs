use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::expense::{Category, ExpenseRecord};
use super::ledger::Ledger;
use super::period::Period;

const PRECISION: u32 = 4;

/// Everything derived from one period of the ledger.
#[derive(Debug, Clone, PartialEq, Getters, CopyGetters)]
pub struct Summary {
    #[getset(get_copy = "pub")]
    period: Period,
    #[getset(get_copy = "pub")]
    records: usize,
    #[getset(get_copy = "pub")]
    total: Decimal,
    #[getset(get_copy = "pub")]
    daily_average: Decimal,
    #[getset(get_copy = "pub")]
    top_category: Option<(Category, Decimal)>,
    #[getset(get = "pub")]
    breakdown: BTreeMap<Category, Decimal>,
    #[getset(get = "pub")]
    trend: Vec<(NaiveDate, Decimal)>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.records == 0
    }
}

pub fn analyze(ledger: &Ledger, period: Period) -> Summary {
    let subset = filter_by_period(ledger, period);

    Summary {
        period,
        records: subset.len(),
        total: monthly_total(&subset),
        daily_average: daily_average(&subset),
        top_category: top_category(&subset),
        breakdown: category_breakdown(&subset),
        trend: daily_trend(&subset),
    }
}

pub fn filter_by_period(ledger: &Ledger, period: Period) -> Vec<&ExpenseRecord> {
    ledger.iter().filter(|record| period.contains(record.date())).collect()
}

/// Distinct periods present in the ledger, most recent first.
pub fn available_periods(ledger: &Ledger) -> Vec<Period> {
    let periods: BTreeSet<Period> = ledger.iter().map(|record| Period::of(record.date())).collect();
    periods.into_iter().rev().collect()
}

pub fn monthly_total(subset: &[&ExpenseRecord]) -> Decimal {
    subset.iter().map(|record| record.amount()).sum()
}

/// Mean of the per-day totals, so several expenses on one day count as a
/// single day.
pub fn daily_average(subset: &[&ExpenseRecord]) -> Decimal {
    let totals = daily_totals(subset);
    if totals.is_empty() {
        return Decimal::ZERO;
    }

    let sum: Decimal = totals.values().sum();
    (sum / Decimal::from(totals.len())).round_dp(PRECISION)
}

/// Category with the largest total. On a tie the category declared first in
/// `Category` wins.
pub fn top_category(subset: &[&ExpenseRecord]) -> Option<(Category, Decimal)> {
    category_breakdown(subset)
        .into_iter()
        .fold(None, |best, (category, amount)| match best {
            Some((_, best_amount)) if best_amount >= amount => best,
            _ => Some((category, amount)),
        })
}

/// Per-category totals. Categories without records are absent.
pub fn category_breakdown(subset: &[&ExpenseRecord]) -> BTreeMap<Category, Decimal> {
    let mut totals = BTreeMap::new();
    for record in subset {
        *totals.entry(record.category()).or_insert(Decimal::ZERO) += record.amount();
    }

    totals
}

/// Percentage of `total` that `amount` represents, zero when there is no total.
pub fn category_share(amount: Decimal, total: Decimal) -> Decimal {
    if total <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    (amount / total * dec!(100)).round_dp(2)
}

/// Per-day totals in ascending date order.
pub fn daily_trend(subset: &[&ExpenseRecord]) -> Vec<(NaiveDate, Decimal)> {
    daily_totals(subset).into_iter().collect()
}

fn daily_totals(subset: &[&ExpenseRecord]) -> BTreeMap<NaiveDate, Decimal> {
    let mut totals = BTreeMap::new();
    for record in subset {
        *totals.entry(record.date()).or_insert(Decimal::ZERO) += record.amount();
    }

    totals
}
