use core_types::{FlowKind, Frequency, IncomeExpenseItem, Override, UserProfile};
use projection::{apply_overrides, build_annual_rows, FireCalculationResult, ProjectionEngine};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

pub mod error;
pub mod recommendation;

// Re-export the core types to provide a clean public API.
pub use error::AdvisorError;
pub use recommendation::{Recommendation, RecommendationKind, RecommendationParams};

/// Convergence tolerance for the percentage sweeps, in percentage points.
const PCT_TOLERANCE: Decimal = dec!(0.1);

/// Iteration cap for the bisection sweeps.
const MAX_ITERATIONS: u32 = 32;

/// Upper bound for the income-uplift and expense-reduction sweeps, in percent.
const PCT_SWEEP_LIMIT: Decimal = dec!(100);

/// Searches for achievable adjustments by re-running the projection engine
/// over bounded parameter sweeps.
///
/// The advisor treats the engine as an oracle: every candidate re-derives
/// the annual projection from scratch and runs the full calculation, with
/// no incremental recomputation.
pub struct Advisor {
    engine: ProjectionEngine,
    profile: UserProfile,
    items: Vec<IncomeExpenseItem>,
    overrides: Vec<Override>,
    as_of_year: i32,
}

impl Advisor {
    pub fn new(
        profile: UserProfile,
        items: Vec<IncomeExpenseItem>,
        overrides: Vec<Override>,
        as_of_year: i32,
    ) -> Self {
        Self {
            engine: ProjectionEngine::new(),
            profile,
            items,
            overrides,
            as_of_year,
        }
    }

    /// Produces at most one recommendation per sweep.
    ///
    /// An achievable baseline yields only the early-retirement search; an
    /// unachievable one yields the delayed-retirement search plus the
    /// income-uplift and expense-reduction searches at the original FIRE
    /// age.
    pub fn recommend(&self) -> Result<Vec<Recommendation>, AdvisorError> {
        let baseline = self.evaluate(&self.profile, &self.items)?;
        debug!(
            achievable = baseline.is_fire_achievable,
            "advisor baseline evaluated"
        );

        let mut recommendations = Vec::new();
        if baseline.is_fire_achievable {
            if let Some(age) = self.earliest_achievable_fire_age()? {
                recommendations.push(Recommendation::new(
                    RecommendationKind::EarlyRetirement,
                    RecommendationParams {
                        target_age: Some(age),
                        ..Default::default()
                    },
                    true,
                ));
            }
        } else {
            recommendations.push(self.delayed_retirement()?);
            recommendations.push(self.smallest_income_uplift()?);
            recommendations.push(self.smallest_expense_reduction()?);
        }
        Ok(recommendations)
    }

    /// The profile and items a recommendation proposes, ready to be fed
    /// back through the engine or the Monte Carlo simulator.
    ///
    /// Returns `None` for recommendations that carry no applicable
    /// parameters (e.g. the not-feasible marker).
    pub fn adjusted_inputs(
        &self,
        recommendation: &Recommendation,
    ) -> Option<(UserProfile, Vec<IncomeExpenseItem>)> {
        if !recommendation.is_achievable {
            return None;
        }
        match recommendation.kind {
            RecommendationKind::EarlyRetirement | RecommendationKind::DelayedRetirement => {
                let age = recommendation.params.target_age?;
                let mut profile = self.profile.clone();
                profile.expected_fire_age = age;
                Some((profile, self.retimed_items(age)))
            }
            RecommendationKind::IncreaseIncome => {
                let pct = recommendation.params.income_increase_pct?;
                let factor = Decimal::ONE + pct / dec!(100);
                Some((self.profile.clone(), self.scaled_items(FlowKind::Income, factor)))
            }
            RecommendationKind::ReduceExpenses => {
                let pct = recommendation.params.expense_reduction_pct?;
                let factor = Decimal::ONE - pct / dec!(100);
                Some((self.profile.clone(), self.scaled_items(FlowKind::Expense, factor)))
            }
            RecommendationKind::DelayedRetirementNotFeasible => None,
        }
    }

    /// Runs one full engine evaluation for a candidate profile/item set.
    fn evaluate(
        &self,
        profile: &UserProfile,
        items: &[IncomeExpenseItem],
    ) -> Result<FireCalculationResult, AdvisorError> {
        let rows = build_annual_rows(profile, items, self.as_of_year)?;
        let rows = apply_overrides(profile, &rows, items, &self.overrides)?;
        Ok(self.engine.calculate(profile, &rows)?)
    }

    fn achievable_at_fire_age(&self, candidate: u32) -> Result<bool, AdvisorError> {
        let mut profile = self.profile.clone();
        profile.expected_fire_age = candidate;
        let items = self.retimed_items(candidate);
        Ok(self.evaluate(&profile, &items)?.is_fire_achievable)
    }

    /// Linear scan from the current age up to the planned FIRE age for the
    /// earliest age that still satisfies achievability.
    fn earliest_achievable_fire_age(&self) -> Result<Option<u32>, AdvisorError> {
        let current_age = self.profile.current_age(self.as_of_year);
        let start = current_age.max(1);
        for candidate in start..self.profile.expected_fire_age {
            if self.achievable_at_fire_age(candidate)? {
                return Ok(Some(candidate));
            }
        }
        Ok(None)
    }

    /// Forward scan from the planned FIRE age up to the legal retirement
    /// age; if even that fails, the plan is reported as not feasible by
    /// delaying alone.
    fn delayed_retirement(&self) -> Result<Recommendation, AdvisorError> {
        for candidate in (self.profile.expected_fire_age + 1)..=self.profile.legal_retirement_age {
            if self.achievable_at_fire_age(candidate)? {
                return Ok(Recommendation::new(
                    RecommendationKind::DelayedRetirement,
                    RecommendationParams {
                        target_age: Some(candidate),
                        ..Default::default()
                    },
                    true,
                ));
            }
        }
        Ok(Recommendation::new(
            RecommendationKind::DelayedRetirementNotFeasible,
            RecommendationParams {
                target_age: Some(self.profile.legal_retirement_age),
                ..Default::default()
            },
            false,
        ))
    }

    fn smallest_income_uplift(&self) -> Result<Recommendation, AdvisorError> {
        let pct = self.bisect_pct(|pct| {
            let factor = Decimal::ONE + pct / dec!(100);
            let items = self.scaled_items(FlowKind::Income, factor);
            self.evaluate(&self.profile, &items)
                .map(|r| r.is_fire_achievable)
        })?;
        Ok(match pct {
            Some(pct) => Recommendation::new(
                RecommendationKind::IncreaseIncome,
                RecommendationParams {
                    income_increase_pct: Some(pct),
                    ..Default::default()
                },
                true,
            ),
            None => Recommendation::new(
                RecommendationKind::IncreaseIncome,
                RecommendationParams {
                    income_increase_pct: Some(PCT_SWEEP_LIMIT),
                    ..Default::default()
                },
                false,
            ),
        })
    }

    fn smallest_expense_reduction(&self) -> Result<Recommendation, AdvisorError> {
        let pct = self.bisect_pct(|pct| {
            let factor = Decimal::ONE - pct / dec!(100);
            let items = self.scaled_items(FlowKind::Expense, factor);
            self.evaluate(&self.profile, &items)
                .map(|r| r.is_fire_achievable)
        })?;
        Ok(match pct {
            Some(pct) => Recommendation::new(
                RecommendationKind::ReduceExpenses,
                RecommendationParams {
                    expense_reduction_pct: Some(pct),
                    ..Default::default()
                },
                true,
            ),
            None => Recommendation::new(
                RecommendationKind::ReduceExpenses,
                RecommendationParams {
                    expense_reduction_pct: Some(PCT_SWEEP_LIMIT),
                    ..Default::default()
                },
                false,
            ),
        })
    }

    /// Bisects over [0, 100] percent for the smallest value whose predicate
    /// holds, to within [`PCT_TOLERANCE`]. The baseline (0%) is known to be
    /// unachievable when these sweeps run. Returns `None` when even the
    /// upper bound fails.
    fn bisect_pct(
        &self,
        mut achievable_at: impl FnMut(Decimal) -> Result<bool, AdvisorError>,
    ) -> Result<Option<Decimal>, AdvisorError> {
        let mut lo = Decimal::ZERO;
        let mut hi = PCT_SWEEP_LIMIT;
        if !achievable_at(hi)? {
            return Ok(None);
        }

        let mut iterations = 0;
        while hi - lo > PCT_TOLERANCE && iterations < MAX_ITERATIONS {
            iterations += 1;
            let mid = (lo + hi) / dec!(2);
            if achievable_at(mid)? {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(Some(hi))
    }

    /// Scales the amounts of all items on one side of the cash flow.
    fn scaled_items(&self, flow: FlowKind, factor: Decimal) -> Vec<IncomeExpenseItem> {
        self.items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.flow == flow {
                    item.amount *= factor;
                }
                item
            })
            .collect()
    }

    /// Moves working-life income items along with a candidate FIRE age.
    ///
    /// Recurring income whose end age abuts the planned FIRE age (ends at
    /// the FIRE age or the year before) is treated as employment income and
    /// keeps the same offset relative to the candidate age, so delaying
    /// retirement extends the earning years and advancing it shortens them.
    fn retimed_items(&self, candidate_fire_age: u32) -> Vec<IncomeExpenseItem> {
        let fire_age = self.profile.expected_fire_age;
        self.items
            .iter()
            .cloned()
            .map(|mut item| {
                if item.flow == FlowKind::Income && item.frequency == Frequency::Recurring {
                    if let Some(end_age) = item.end_age {
                        if end_age == fire_age || end_age + 1 == fire_age {
                            let offset = fire_age - end_age;
                            let moved = candidate_fire_age.saturating_sub(offset);
                            item.end_age = Some(moved.max(item.start_age));
                        }
                    }
                }
                item
            })
            .collect()
    }
}
