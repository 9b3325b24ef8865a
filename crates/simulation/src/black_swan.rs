use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// The kinds of rare, high-impact shocks a trial year can suffer.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlackSwanKind {
    MarketCrash,
    JobLoss,
    MedicalExpense,
    HomeRepair,
}

/// One entry of the shock catalogue.
///
/// Each year of a trial rolls independently against every entry. A
/// triggered event scales that year's cash flow and/or adds a one-time
/// cost to the year's expenses (which is how a one-off hit to net worth
/// flows through the rows contract).
#[derive(Debug, Clone)]
pub struct BlackSwanEvent {
    pub kind: BlackSwanKind,
    pub annual_probability: f64,
    pub income_multiplier: Decimal,
    pub expense_multiplier: Decimal,
    pub one_time_cost: Decimal,
}

/// The fixed shock catalogue.
pub fn catalogue() -> [BlackSwanEvent; 4] {
    [
        // A crash year halves the cash thrown off by work and assets.
        BlackSwanEvent {
            kind: BlackSwanKind::MarketCrash,
            annual_probability: 0.02,
            income_multiplier: dec!(0.5),
            expense_multiplier: dec!(1),
            one_time_cost: dec!(0),
        },
        BlackSwanEvent {
            kind: BlackSwanKind::JobLoss,
            annual_probability: 0.015,
            income_multiplier: dec!(0.2),
            expense_multiplier: dec!(1),
            one_time_cost: dec!(0),
        },
        BlackSwanEvent {
            kind: BlackSwanKind::MedicalExpense,
            annual_probability: 0.01,
            income_multiplier: dec!(1),
            expense_multiplier: dec!(1.2),
            one_time_cost: dec!(30000),
        },
        BlackSwanEvent {
            kind: BlackSwanKind::HomeRepair,
            annual_probability: 0.02,
            income_multiplier: dec!(1),
            expense_multiplier: dec!(1),
            one_time_cost: dec!(15000),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalogue_probabilities_are_small_and_valid() {
        for event in catalogue() {
            assert!(event.annual_probability > 0.0);
            assert!(event.annual_probability < 0.1);
            assert!(event.income_multiplier >= Decimal::ZERO);
            assert!(event.expense_multiplier >= Decimal::ZERO);
            assert!(event.one_time_cost >= Decimal::ZERO);
        }
    }
}
