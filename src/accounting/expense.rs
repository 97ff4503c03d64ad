use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use getset::{CopyGetters, Getters};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::ValidationError;

/// Largest amount a single record may carry. Keeps ledger-wide sums well
/// inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = dec!(1000000000000000);

/// Spending categories, declared in their canonical order. The derived `Ord`
/// follows this order and is relied upon for breakdown ordering and ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Makanan & Minuman")]
    FoodAndDrink,
    #[serde(rename = "Transportasi")]
    Transport,
    #[serde(rename = "Belanja")]
    Shopping,
    #[serde(rename = "Hiburan")]
    Entertainment,
    #[serde(rename = "Tagihan")]
    Bills,
    #[serde(rename = "Kesehatan")]
    Health,
    #[serde(rename = "Pendidikan")]
    Education,
    #[serde(rename = "Lainnya")]
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::FoodAndDrink,
        Category::Transport,
        Category::Shopping,
        Category::Entertainment,
        Category::Bills,
        Category::Health,
        Category::Education,
        Category::Other,
    ];

    /// Label written to the data file.
    pub fn label(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "Makanan & Minuman",
            Category::Transport => "Transportasi",
            Category::Shopping => "Belanja",
            Category::Entertainment => "Hiburan",
            Category::Bills => "Tagihan",
            Category::Health => "Kesehatan",
            Category::Education => "Pendidikan",
            Category::Other => "Lainnya",
        }
    }

    /// Short name accepted on the command line.
    pub fn short_name(&self) -> &'static str {
        match self {
            Category::FoodAndDrink => "food",
            Category::Transport => "transport",
            Category::Shopping => "shopping",
            Category::Entertainment => "entertainment",
            Category::Bills => "bills",
            Category::Health => "health",
            Category::Education => "education",
            Category::Other => "other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

#[derive(Debug, PartialEq, Error)]
#[error("unknown category `{0}`")]
pub struct ParseCategoryError(String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted) || c.short_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ParseCategoryError(wanted.to_string()))
    }
}

/// A single expense. Fields are read-only so a record that exists always has
/// a strictly positive amount.
#[derive(Debug, Clone, PartialEq, Eq, Getters, CopyGetters)]
pub struct ExpenseRecord {
    #[getset(get_copy = "pub")]
    date: NaiveDate,
    #[getset(get_copy = "pub")]
    amount: Decimal,
    #[getset(get_copy = "pub")]
    category: Category,
    #[getset(get = "pub")]
    description: Option<String>,
}

impl ExpenseRecord {
    pub fn new(
        date: NaiveDate,
        amount: Decimal,
        category: Category,
        description: Option<String>,
    ) -> Result<ExpenseRecord, ValidationError> {
        if amount <= dec!(0) {
            return Err(ValidationError::InvalidAmount);
        }

        if amount > MAX_AMOUNT {
            return Err(ValidationError::AmountTooLarge { max: MAX_AMOUNT });
        }

        // An empty description is stored as an empty field, which reads back as none.
        let description = description.filter(|text| !text.is_empty());

        Ok(ExpenseRecord {
            date,
            amount,
            category,
            description,
        })
    }
}
