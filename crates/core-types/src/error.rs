use rust_decimal::Decimal;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid input for {0}: {1}")]
    Validation(String, String),

    #[error("Portfolio allocations sum to {0}%, expected 100% (± {1})")]
    InvalidAllocation(Decimal, Decimal),

    #[error("Inconsistent ages: {0}")]
    InvalidAges(String),
}
