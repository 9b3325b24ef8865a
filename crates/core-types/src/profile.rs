use crate::enums::LiquidityTier;
use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How far the sum of allocation percentages may deviate from 100.
pub const ALLOCATION_TOLERANCE: Decimal = dec!(0.01);

/// A single asset class within the household portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    pub name: String,
    /// Share of the portfolio allocated to this class, in percent.
    pub allocation_pct: Decimal,
    /// Expected simple annual return, in percent (e.g. `7.0` = 7% p.a.).
    pub expected_return_pct: Decimal,
    /// Annual return volatility, in percent.
    pub volatility_pct: Decimal,
    pub liquidity: LiquidityTier,
}

/// The household's multi-asset portfolio allocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Portfolio {
    pub assets: Vec<AssetClass>,
    /// When set, allocation weights are renormalized to their target
    /// percentages every year instead of drifting with returns.
    pub enable_rebalancing: bool,
}

impl Portfolio {
    /// Checks that the allocation percentages sum to 100 within
    /// [`ALLOCATION_TOLERANCE`].
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.assets.is_empty() {
            return Err(CoreError::Validation(
                "portfolio".to_string(),
                "must contain at least one asset class".to_string(),
            ));
        }
        let total: Decimal = self.assets.iter().map(|a| a.allocation_pct).sum();
        if (total - dec!(100)).abs() > ALLOCATION_TOLERANCE {
            return Err(CoreError::InvalidAllocation(total, ALLOCATION_TOLERANCE));
        }
        Ok(())
    }

    /// Allocation-weighted average of the asset classes' expected annual
    /// returns, in percent.
    ///
    /// With the single-pool net-worth model the target weights never drift,
    /// so yearly renormalization reduces to recomputing this average from
    /// the target percentages each year.
    pub fn weighted_expected_return_pct(&self) -> Decimal {
        self.assets
            .iter()
            .map(|a| a.allocation_pct * a.expected_return_pct / dec!(100))
            .sum()
    }
}

impl Default for Portfolio {
    /// A conventional 60/30/10 stocks/bonds/cash split.
    fn default() -> Self {
        Self {
            assets: vec![
                AssetClass {
                    name: "stocks".to_string(),
                    allocation_pct: dec!(60),
                    expected_return_pct: dec!(7.0),
                    volatility_pct: dec!(15.0),
                    liquidity: LiquidityTier::Liquid,
                },
                AssetClass {
                    name: "bonds".to_string(),
                    allocation_pct: dec!(30),
                    expected_return_pct: dec!(3.5),
                    volatility_pct: dec!(5.0),
                    liquidity: LiquidityTier::SemiLiquid,
                },
                AssetClass {
                    name: "cash".to_string(),
                    allocation_pct: dec!(10),
                    expected_return_pct: dec!(1.0),
                    volatility_pct: dec!(0.5),
                    liquidity: LiquidityTier::Liquid,
                },
            ],
            enable_rebalancing: true,
        }
    }
}

/// The household's demographic and financial profile.
///
/// Every field has a documented default, so a configuration document may
/// specify only the values that differ.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub birth_year: i32,
    /// The age at which the household intends to stop working.
    pub expected_fire_age: u32,
    /// The age at which pension / legal retirement income begins.
    pub legal_retirement_age: u32,
    /// Planning horizon; the projection ends at this age.
    pub life_expectancy: u32,
    pub current_net_worth: Decimal,
    /// Annual household inflation rate, in percent.
    pub inflation_rate_pct: Decimal,
    /// Cash cushion the household wants to hold, in months of expenses.
    pub safety_buffer_months: Decimal,
    pub portfolio: Portfolio,
}

impl UserProfile {
    /// Checks the age chain and the portfolio allocation.
    ///
    /// The ages must satisfy
    /// `birth_year < fire year <= legal retirement year <= life expectancy year`,
    /// which for ages on the same birth year collapses to
    /// `expected_fire_age <= legal_retirement_age <= life_expectancy`.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.expected_fire_age == 0 {
            return Err(CoreError::InvalidAges(
                "expected_fire_age must be greater than zero".to_string(),
            ));
        }
        if self.expected_fire_age > self.legal_retirement_age {
            return Err(CoreError::InvalidAges(format!(
                "expected_fire_age ({}) must not exceed legal_retirement_age ({})",
                self.expected_fire_age, self.legal_retirement_age
            )));
        }
        if self.legal_retirement_age > self.life_expectancy {
            return Err(CoreError::InvalidAges(format!(
                "legal_retirement_age ({}) must not exceed life_expectancy ({})",
                self.legal_retirement_age, self.life_expectancy
            )));
        }
        if self.safety_buffer_months < Decimal::ZERO {
            return Err(CoreError::Validation(
                "safety_buffer_months".to_string(),
                "must not be negative".to_string(),
            ));
        }
        self.portfolio.validate()
    }

    /// The household's age in `as_of_year`, clamped at zero for birth years
    /// in the future.
    pub fn current_age(&self, as_of_year: i32) -> u32 {
        (as_of_year - self.birth_year).max(0) as u32
    }

    /// The calendar year in which the household reaches `age`.
    pub fn year_at_age(&self, age: u32) -> i32 {
        self.birth_year + age as i32
    }
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            birth_year: 1990,
            expected_fire_age: 45,
            legal_retirement_age: 67,
            life_expectancy: 90,
            current_net_worth: Decimal::ZERO,
            inflation_rate_pct: dec!(2.0),
            safety_buffer_months: dec!(6),
            portfolio: Portfolio::default(),
        }
    }
}
