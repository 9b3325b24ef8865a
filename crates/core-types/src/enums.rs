use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The period an item's amount refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeUnit {
    #[default]
    Monthly,
    Annual,
}

impl TimeUnit {
    /// Multiplier that converts one period's amount into a per-year amount.
    pub fn annual_factor(&self) -> Decimal {
        match self {
            TimeUnit::Monthly => dec!(12),
            TimeUnit::Annual => dec!(1),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    #[default]
    Recurring,
    OneTime,
}

/// Whether an item adds to or subtracts from the household's cash flow.
///
/// The default only serves deserialization; the configuration layer stamps
/// the flow from the array an item was listed under.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowKind {
    #[default]
    Income,
    Expense,
}

/// How quickly an asset class can be converted to cash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LiquidityTier {
    Liquid,
    SemiLiquid,
    Illiquid,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Salary,
    Investment,
    Pension,
    Living,
    Housing,
    Healthcare,
    Leisure,
    #[default]
    Other,
}
