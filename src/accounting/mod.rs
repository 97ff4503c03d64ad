use rust_decimal::Decimal;
use thiserror::Error;

pub mod analytics;
pub mod expense;
pub mod ledger;
pub mod period;


/// Rejections raised while building or mutating a ledger. Each aborts the
/// operation and leave the ledger untouched.
#[derive(Debug, PartialEq, Error)]
pub enum ValidationError {
    #[error("amount must be greater than zero")]
    InvalidAmount,
    #[error("amount must not exceed {max}")]
    AmountTooLarge { max: Decimal },
    #[error("position {position} is out of range, the ledger has {len} record(s)")]
    PositionOutOfRange { position: usize, len: usize },
}
