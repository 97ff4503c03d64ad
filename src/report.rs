//! Terminal rendering of handler outcomes.

use std::io::{self, Write};

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::accounting::analytics::{category_share, Summary};
use crate::accounting::expense::ExpenseRecord;
use crate::commands::Outcome;
use crate::data::ExportTarget;

const BAR_WIDTH: u32 = 30;

pub fn render<W: Write>(outcome: &Outcome, out: &mut W) -> io::Result<()> {
    match outcome {
        Outcome::Added { position, record } => {
            writeln!(out, "Added expense #{}: {}", position, describe(record))
        },
        Outcome::Deleted { position, record } => {
            writeln!(out, "Deleted expense #{}: {}", position, describe(record))
        },
        Outcome::Listing(rows) => render_listing(rows, out),
        Outcome::Periods(periods) => {
            for period in periods {
                writeln!(out, "{}", period)?;
            }
            Ok(())
        },
        Outcome::Analysis(summary) => render_summary(summary, out),
        // The CSV itself went to stdout, nothing more to print.
        Outcome::Exported {
            target: ExportTarget::Stdout,
            ..
        } => Ok(()),
        Outcome::Exported { target, rows } => writeln!(out, "Exported {} expense(s) to {}", rows, target),
        Outcome::NoData => writeln!(
            out,
            "No expenses recorded yet. Add one with `spendbook add --amount <AMOUNT> --category <CATEGORY>`."
        ),
    }
}

fn describe(record: &ExpenseRecord) -> String {
    let mut text = format!(
        "{} {} {}",
        record.date(),
        record.category(),
        format_amount(record.amount())
    );
    if let Some(description) = record.description() {
        text.push_str(" (");
        text.push_str(description);
        text.push(')');
    }

    text
}

fn render_listing<W: Write>(rows: &[(usize, ExpenseRecord)], out: &mut W) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "No expenses recorded yet.");
    }

    writeln!(out, "{:>4}  {:<10}  {:>18}  {:<17}  Description", "ID", "Date", "Amount", "Category")?;
    for (position, record) in rows {
        writeln!(
            out,
            "{:>4}  {:<10}  {:>18}  {:<17}  {}",
            position,
            record.date(),
            format_amount(record.amount()),
            record.category(),
            record.description().as_deref().unwrap_or("")
        )?;
    }

    Ok(())
}

fn render_summary<W: Write>(summary: &Summary, out: &mut W) -> io::Result<()> {
    writeln!(out, "Summary for {}", summary.period())?;
    if summary.is_empty() {
        return writeln!(out, "No expenses recorded in this month.");
    }

    writeln!(out, "  Total spent:    {}", format_amount(summary.total()))?;
    writeln!(out, "  Daily average:  {}", format_amount(summary.daily_average()))?;
    if let Some((category, amount)) = summary.top_category() {
        writeln!(out, "  Top category:   {} ({})", category, format_amount(amount))?;
    }

    writeln!(out)?;
    writeln!(out, "By category")?;
    for (category, amount) in summary.breakdown() {
        let share = category_share(*amount, summary.total());
        writeln!(
            out,
            "  {:<17} {:>18} {:>7}% {}",
            category,
            format_amount(*amount),
            share,
            bar(share)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Daily trend")?;
    for (date, amount) in summary.trend() {
        writeln!(out, "  {}  {:>18}", date, format_amount(*amount))?;
    }

    Ok(())
}

fn bar(share: Decimal) -> String {
    let width = (share * Decimal::from(BAR_WIDTH) / dec!(100)).round().to_usize().unwrap_or(0);
    "#".repeat(width)
}

/// Formats as rupiah with thousands separators, e.g. `Rp 1,234,567.50`.
pub fn format_amount(amount: Decimal) -> String {
    let fixed = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (index, digit) in whole.chars().enumerate() {
        if index > 0 && (whole.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    format!("{}Rp {}.{}", sign, grouped, fraction)
}
