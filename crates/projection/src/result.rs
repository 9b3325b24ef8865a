use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One year of the deterministic financial trajectory.
///
/// Owned exclusively by the [`FireCalculationResult`] containing the full
/// trajectory; states are never shared between results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyState {
    pub age: u32,
    pub year: i32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// Simple return earned on the previous year's portfolio value.
    pub investment_return: Decimal,
    pub net_cash_flow: Decimal,
    pub portfolio_value: Decimal,
    pub net_worth: Decimal,
    /// True iff net worth stays non-negative from this year through the end
    /// of the trajectory (forward-looking solvency, not this year's sign).
    pub is_sustainable: bool,
    /// Target net worth implied by this year's expenses (25x rule).
    pub fire_number: Decimal,
    /// `net_worth / fire_number`, clamped to be non-negative.
    pub fire_progress: Decimal,
}

/// The engine's verdict for a full profile + cash-flow configuration.
///
/// This struct is the final output of the `ProjectionEngine` and serves as
/// the data transfer object for projection results throughout the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FireCalculationResult {
    pub is_fire_achievable: bool,
    /// Net worth in the year the household reaches its expected FIRE age.
    pub fire_net_worth: Decimal,
    /// Lowest net worth observed from the FIRE age through life expectancy.
    pub min_net_worth_after_fire: Decimal,
    pub final_net_worth: Decimal,
    /// The profile's base cash cushion, in months of expenses.
    pub safety_buffer_months: Decimal,
    /// Worst observed ratio of net worth to the required safety buffer
    /// across retirement years; values below 1 mean the buffer is breached.
    pub min_safety_buffer_ratio: Decimal,
    /// 25x the first retirement year's expenses (the "4% rule" target).
    pub traditional_fire_number: Decimal,
    pub traditional_fire_achieved: bool,
    pub retirement_years: u32,
    pub total_years_simulated: u32,
    pub years: Vec<YearlyState>,
}
