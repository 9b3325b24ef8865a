use crate::buffer::{BridgeBufferPolicy, BufferPolicy};
use crate::error::ProjectionError;
use crate::result::{FireCalculationResult, YearlyState};
use core_types::{AnnualProjectionRow, UserProfile};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

/// Net-worth multiple of annual expenses implied by a 4% safe withdrawal
/// rate.
pub const FIRE_MULTIPLE: Decimal = dec!(25);

/// Sentinel for ratios whose denominator is zero or negative. Keeps the
/// trajectory free of NaN/Infinity: a positive net worth against a zero
/// target reports this cap, a non-positive one reports zero.
pub const RATIO_CAP: Decimal = dec!(1000);

/// The deterministic year-by-year projection engine.
///
/// A pure function of its inputs: identical profile + rows always produce
/// an identical result. The only injected behavior is the [`BufferPolicy`]
/// that decides how many months of cushion a given retirement year needs.
pub struct ProjectionEngine {
    buffer_policy: Box<dyn BufferPolicy>,
}

impl ProjectionEngine {
    pub fn new() -> Self {
        Self::with_buffer_policy(Box::new(BridgeBufferPolicy::default()))
    }

    pub fn with_buffer_policy(buffer_policy: Box<dyn BufferPolicy>) -> Self {
        Self { buffer_policy }
    }

    /// The cash cushion required at `age`, given that year's annual expense.
    pub fn required_safety_buffer(
        &self,
        profile: &UserProfile,
        age: u32,
        annual_expense: Decimal,
    ) -> Decimal {
        annual_expense * self.buffer_policy.required_buffer_months(age, profile) / dec!(12)
    }

    /// Runs the full projection and produces the FIRE verdict.
    ///
    /// The supplied rows must already carry inflation/growth adjustments and
    /// any overrides; the engine only aggregates them year by year.
    pub fn calculate(
        &self,
        profile: &UserProfile,
        rows: &[AnnualProjectionRow],
    ) -> Result<FireCalculationResult, ProjectionError> {
        // --- 1. Validation ---
        profile.validate()?;
        validate_rows(profile, rows)?;

        // --- 2. Forward pass over the trajectory ---
        let weighted_return = profile.portfolio.weighted_expected_return_pct() / dec!(100);
        let mut years: Vec<YearlyState> = Vec::with_capacity(rows.len());
        let mut portfolio_value = profile.current_net_worth;

        for row in rows {
            let net_cash_flow = row.total_income - row.total_expense;
            let investment_return = portfolio_value * weighted_return;
            portfolio_value += investment_return + net_cash_flow;

            // Single-pool model: the portfolio is the household's net worth.
            let net_worth = portfolio_value;
            let fire_number = row.total_expense * FIRE_MULTIPLE;
            let fire_progress = clamped_progress(net_worth, fire_number);

            years.push(YearlyState {
                age: row.age,
                year: row.year,
                total_income: row.total_income,
                total_expense: row.total_expense,
                investment_return,
                net_cash_flow,
                portfolio_value,
                net_worth,
                is_sustainable: true,
                fire_number,
                fire_progress,
            });
        }

        // --- 3. Back-propagate solvency ---
        // A year is sustainable only if net worth stays non-negative from
        // that year through the end of the trajectory.
        let mut suffix_min = Decimal::MAX;
        for state in years.iter_mut().rev() {
            suffix_min = suffix_min.min(state.net_worth);
            state.is_sustainable = suffix_min >= Decimal::ZERO;
        }

        // --- 4. Retirement statistics and the FIRE verdict ---
        let fire_age = profile.expected_fire_age;
        let fire_state = years
            .iter()
            .find(|s| s.age == fire_age)
            .expect("fire age validated against the row range");
        let fire_net_worth = fire_state.net_worth;
        let traditional_fire_number = fire_state.total_expense * FIRE_MULTIPLE;
        let traditional_fire_achieved = fire_net_worth >= traditional_fire_number;

        let mut min_net_worth_after_fire = Decimal::MAX;
        let mut min_safety_buffer_ratio = RATIO_CAP;
        let mut retirement_years = 0u32;
        for state in years.iter().filter(|s| s.age >= fire_age) {
            retirement_years += 1;
            min_net_worth_after_fire = min_net_worth_after_fire.min(state.net_worth);

            let required = self.required_safety_buffer(profile, state.age, state.total_expense);
            min_safety_buffer_ratio = min_safety_buffer_ratio.min(buffer_ratio(state.net_worth, required));
        }

        let is_fire_achievable =
            min_net_worth_after_fire >= Decimal::ZERO && min_safety_buffer_ratio >= Decimal::ONE;
        let final_net_worth = years.last().expect("rows are non-empty").net_worth;
        let total_years_simulated = years.len() as u32;

        debug!(
            years = total_years_simulated,
            achievable = is_fire_achievable,
            "projection calculated"
        );

        Ok(FireCalculationResult {
            is_fire_achievable,
            fire_net_worth,
            min_net_worth_after_fire,
            final_net_worth,
            safety_buffer_months: profile.safety_buffer_months,
            min_safety_buffer_ratio,
            traditional_fire_number,
            traditional_fire_achieved,
            retirement_years,
            total_years_simulated,
            years,
        })
    }
}

impl Default for ProjectionEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// `net_worth / fire_number`, clamped to be non-negative, with the
/// [`RATIO_CAP`] sentinel when the target is zero or negative.
fn clamped_progress(net_worth: Decimal, fire_number: Decimal) -> Decimal {
    if fire_number <= Decimal::ZERO {
        if net_worth > Decimal::ZERO {
            RATIO_CAP
        } else {
            Decimal::ZERO
        }
    } else {
        (net_worth / fire_number).max(Decimal::ZERO)
    }
}

/// `net_worth / required_buffer`; a zero or negative requirement is
/// trivially satisfied and reports the [`RATIO_CAP`] sentinel. Unlike the
/// progress ratio this may go negative, flagging a breached buffer.
fn buffer_ratio(net_worth: Decimal, required_buffer: Decimal) -> Decimal {
    if required_buffer <= Decimal::ZERO {
        RATIO_CAP
    } else {
        net_worth / required_buffer
    }
}

fn validate_rows(profile: &UserProfile, rows: &[AnnualProjectionRow]) -> Result<(), ProjectionError> {
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(ProjectionError::EmptyRows),
    };

    for pair in rows.windows(2) {
        if pair[1].age != pair[0].age + 1 {
            return Err(ProjectionError::NonContiguousRows(format!(
                "age {} follows age {}",
                pair[1].age, pair[0].age
            )));
        }
    }
    if last.age != profile.life_expectancy {
        return Err(ProjectionError::HorizonMismatch {
            last: last.age,
            expected: profile.life_expectancy,
        });
    }
    if profile.expected_fire_age < first.age || profile.expected_fire_age > last.age {
        return Err(ProjectionError::FireAgeOutOfRange {
            fire_age: profile.expected_fire_age,
            first: first.age,
            last: last.age,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{AssetClass, LiquidityTier, Portfolio};

    fn single_asset_profile(return_pct: Decimal) -> UserProfile {
        UserProfile {
            birth_year: 1961,
            expected_fire_age: 65,
            legal_retirement_age: 65,
            life_expectancy: 65,
            current_net_worth: dec!(1000),
            inflation_rate_pct: dec!(0),
            safety_buffer_months: dec!(6),
            portfolio: Portfolio {
                assets: vec![AssetClass {
                    name: "stocks".to_string(),
                    allocation_pct: dec!(100),
                    expected_return_pct: return_pct,
                    volatility_pct: dec!(0),
                    liquidity: LiquidityTier::Liquid,
                }],
                enable_rebalancing: false,
            },
        }
    }

    fn row(age: u32, income: Decimal, expense: Decimal) -> AnnualProjectionRow {
        AnnualProjectionRow {
            age,
            year: 1961 + age as i32,
            total_income: income,
            total_expense: expense,
        }
    }

    #[test]
    fn two_year_trajectory_math() {
        let profile = single_asset_profile(dec!(10));
        let rows = vec![row(64, dec!(100), dec!(50)), row(65, dec!(0), dec!(40))];

        let result = ProjectionEngine::new()
            .calculate(&profile, &rows)
            .expect("calculates");

        let first = &result.years[0];
        assert_eq!(first.investment_return, dec!(100));
        assert_eq!(first.net_cash_flow, dec!(50));
        assert_eq!(first.net_worth, dec!(1150));
        assert_eq!(first.fire_number, dec!(1250));
        assert_eq!(first.fire_progress, dec!(0.92));

        let second = &result.years[1];
        assert_eq!(second.investment_return, dec!(115));
        assert_eq!(second.net_worth, dec!(1225));

        assert_eq!(result.fire_net_worth, dec!(1225));
        assert_eq!(result.final_net_worth, dec!(1225));
        assert_eq!(result.traditional_fire_number, dec!(1000));
        assert!(result.traditional_fire_achieved);
        assert_eq!(result.retirement_years, 1);
        assert_eq!(result.total_years_simulated, 2);
        // Required buffer at 65: 40 * 6 / 12 = 20, ratio 61.25.
        assert_eq!(result.min_safety_buffer_ratio, dec!(61.25));
        assert!(result.is_fire_achievable);
    }

    #[test]
    fn sustainability_looks_forward_not_at_the_current_sign() {
        let mut profile = single_asset_profile(dec!(0));
        profile.current_net_worth = Decimal::ZERO;
        let rows = vec![
            row(63, dec!(100), dec!(0)),  // net worth 100
            row(64, dec!(0), dec!(300)),  // net worth -200
            row(65, dec!(500), dec!(0)),  // net worth 300
        ];

        let result = ProjectionEngine::new()
            .calculate(&profile, &rows)
            .expect("calculates");

        assert!(!result.years[0].is_sustainable);
        assert!(!result.years[1].is_sustainable);
        assert!(result.years[2].is_sustainable);
    }

    #[test]
    fn surplus_household_achieves_fire() {
        // High net worth and income far above expenses.
        let mut profile = UserProfile::default();
        profile.birth_year = 1990;
        profile.current_net_worth = dec!(2000000);
        let rows: Vec<_> = (36..=90)
            .map(|age| {
                let income = if age < 45 { dec!(200000) } else { dec!(0) };
                AnnualProjectionRow {
                    age,
                    year: 1990 + age as i32,
                    total_income: income,
                    total_expense: dec!(40000),
                }
            })
            .collect();

        let result = ProjectionEngine::new()
            .calculate(&profile, &rows)
            .expect("calculates");

        assert!(result.is_fire_achievable);
        assert!(result.traditional_fire_achieved);
        assert!(result.min_net_worth_after_fire > Decimal::ZERO);
        assert!(result.min_safety_buffer_ratio >= Decimal::ONE);
    }

    #[test]
    fn chronic_deficit_household_does_not_achieve_fire() {
        let mut profile = UserProfile::default();
        profile.expected_fire_age = 40;
        profile.current_net_worth = dec!(10000);
        let rows: Vec<_> = (36..=90)
            .map(|age| AnnualProjectionRow {
                age,
                year: 1990 + age as i32,
                total_income: dec!(20000),
                total_expense: dec!(30000),
            })
            .collect();

        let result = ProjectionEngine::new()
            .calculate(&profile, &rows)
            .expect("calculates");

        assert!(!result.is_fire_achievable);
        assert!(result.min_net_worth_after_fire < Decimal::ZERO);
        assert!(!result.years.last().expect("rows").is_sustainable);
    }

    #[test]
    fn zero_expense_years_use_the_ratio_sentinels() {
        let profile = single_asset_profile(dec!(0));
        let rows = vec![row(65, dec!(10), dec!(0))];
        let result = ProjectionEngine::new()
            .calculate(&profile, &rows)
            .expect("calculates");
        assert_eq!(result.years[0].fire_number, Decimal::ZERO);
        assert_eq!(result.years[0].fire_progress, RATIO_CAP);
        assert_eq!(result.min_safety_buffer_ratio, RATIO_CAP);

        let mut broke = single_asset_profile(dec!(0));
        broke.current_net_worth = dec!(-100);
        let result = ProjectionEngine::new()
            .calculate(&broke, &rows)
            .expect("calculates");
        assert_eq!(result.years[0].fire_progress, Decimal::ZERO);
    }

    #[test]
    fn fire_progress_is_never_negative() {
        let mut profile = single_asset_profile(dec!(0));
        profile.current_net_worth = dec!(-500);
        let rows = vec![row(65, dec!(0), dec!(100))];
        let result = ProjectionEngine::new()
            .calculate(&profile, &rows)
            .expect("calculates");
        assert_eq!(result.years[0].fire_progress, Decimal::ZERO);
        assert!(result.years[0].fire_number > Decimal::ZERO);
    }

    #[test]
    fn empty_rows_are_rejected() {
        let profile = single_asset_profile(dec!(5));
        assert!(matches!(
            ProjectionEngine::new().calculate(&profile, &[]),
            Err(ProjectionError::EmptyRows)
        ));
    }

    #[test]
    fn non_contiguous_ages_are_rejected() {
        let mut profile = single_asset_profile(dec!(5));
        profile.life_expectancy = 66;
        profile.legal_retirement_age = 66;
        profile.expected_fire_age = 64;
        let rows = vec![row(64, dec!(0), dec!(0)), row(66, dec!(0), dec!(0))];
        assert!(matches!(
            ProjectionEngine::new().calculate(&profile, &rows),
            Err(ProjectionError::NonContiguousRows(_))
        ));
    }

    #[test]
    fn horizon_mismatch_is_rejected() {
        let profile = single_asset_profile(dec!(5)); // life expectancy 65
        let rows = vec![row(63, dec!(0), dec!(0)), row(64, dec!(0), dec!(0))];
        assert!(matches!(
            ProjectionEngine::new().calculate(&profile, &rows),
            Err(ProjectionError::HorizonMismatch { .. })
        ));
    }

    #[test]
    fn fire_age_outside_rows_is_rejected() {
        let mut profile = single_asset_profile(dec!(5));
        profile.expected_fire_age = 40;
        profile.legal_retirement_age = 65;
        let rows = vec![row(64, dec!(0), dec!(0)), row(65, dec!(0), dec!(0))];
        assert!(matches!(
            ProjectionEngine::new().calculate(&profile, &rows),
            Err(ProjectionError::FireAgeOutOfRange { .. })
        ));
    }

    #[test]
    fn unbalanced_portfolio_is_rejected() {
        let mut profile = single_asset_profile(dec!(5));
        profile.portfolio.assets[0].allocation_pct = dec!(90);
        let rows = vec![row(65, dec!(0), dec!(0))];
        assert!(matches!(
            ProjectionEngine::new().calculate(&profile, &rows),
            Err(ProjectionError::Core(_))
        ));
    }

    #[test]
    fn identical_inputs_produce_byte_identical_results() {
        let profile = single_asset_profile(dec!(7));
        let rows = vec![row(64, dec!(1234.56), dec!(789.01)), row(65, dec!(0), dec!(2000))];

        let engine = ProjectionEngine::new();
        let a = engine.calculate(&profile, &rows).expect("calculates");
        let b = engine.calculate(&profile, &rows).expect("calculates");

        let a_json = serde_json::to_string(&a).expect("serializes");
        let b_json = serde_json::to_string(&b).expect("serializes");
        assert_eq!(a_json, b_json);
    }
}
