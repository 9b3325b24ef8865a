use core_types::{AnnualProjectionRow, SimulationSettings, UserProfile};
use projection::ProjectionEngine;
use rayon::prelude::*;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

pub mod black_swan;
pub mod error;
pub mod result;
pub mod rng;
pub mod statistics;

// Re-export the core types to provide a clean public API.
pub use black_swan::{catalogue, BlackSwanEvent, BlackSwanKind};
pub use error::SimulationError;
pub use result::{BlackSwanImpact, MonteCarloResult, PlanStatus, StatusRates};
pub use rng::TrialRng;

/// Cooperative cancellation flag, checked at trial-batch boundaries.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// Scalar outputs of a single trial, combined only during aggregation.
struct TrialOutcome {
    achievable: bool,
    min_net_worth: Decimal,
    /// Status per projected year, aligned with the row ages.
    statuses: Vec<PlanStatus>,
    /// Worst status across the trial's post-FIRE years.
    plan_status: PlanStatus,
    events: Vec<BlackSwanKind>,
}

/// Runs many stochastic re-runs of the deterministic projection engine and
/// aggregates the distribution of outcomes.
pub struct MonteCarloSimulator {
    engine: ProjectionEngine,
}

impl MonteCarloSimulator {
    pub fn new() -> Self {
        Self {
            engine: ProjectionEngine::new(),
        }
    }

    pub fn with_engine(engine: ProjectionEngine) -> Self {
        Self { engine }
    }

    /// Runs `settings.num_simulations` independent trials.
    ///
    /// Trials are processed in batches; inside a batch they fan out across
    /// the rayon worker pool, since each depends only on its own seed and
    /// the shared immutable inputs. After every batch the progress callback
    /// receives a monotonically increasing `(completed, total)` pair and
    /// the cancellation token is checked; cancelling aborts with the
    /// explicit [`SimulationError::Cancelled`] status.
    ///
    /// A trial whose perturbed projection fails is counted as skipped and
    /// excluded from aggregation; it never aborts the batch.
    pub fn run<F>(
        &self,
        profile: &UserProfile,
        rows: &[AnnualProjectionRow],
        settings: &SimulationSettings,
        seed: u64,
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<MonteCarloResult, SimulationError>
    where
        F: FnMut(u32, u32),
    {
        settings.validate()?;
        // Structural configuration errors surface here, immediately, rather
        // than as a batch full of skipped trials.
        self.engine.calculate(profile, rows)?;

        let total = settings.num_simulations;
        let batch_size = (total / 20).max(1);
        let mut outcomes: Vec<TrialOutcome> = Vec::with_capacity(total as usize);
        let mut skipped = 0u32;

        on_progress(0, total);
        let mut next = 0u32;
        while next < total {
            if cancel.is_cancelled() {
                return Err(SimulationError::Cancelled);
            }
            let end = next.saturating_add(batch_size).min(total);
            let batch: Vec<Option<TrialOutcome>> = (next..end)
                .into_par_iter()
                .map(|trial| {
                    self.run_trial(
                        profile,
                        rows,
                        settings,
                        TrialRng::derive_seed(seed, trial as u64),
                    )
                })
                .collect();
            for outcome in batch {
                match outcome {
                    Some(outcome) => outcomes.push(outcome),
                    None => skipped += 1,
                }
            }
            on_progress(end, total);
            next = end;
        }

        debug!(
            completed = outcomes.len(),
            skipped, "monte carlo batch finished"
        );
        self.aggregate(profile, rows, settings, outcomes, skipped)
    }

    /// One full stochastic re-run of the engine on perturbed rows.
    fn run_trial(
        &self,
        profile: &UserProfile,
        rows: &[AnnualProjectionRow],
        settings: &SimulationSettings,
        trial_seed: u64,
    ) -> Option<TrialOutcome> {
        let mut rng = TrialRng::from_seed(trial_seed);
        let income_vol = (settings.income_base_volatility_pct / Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0);
        let expense_vol = (settings.expense_base_volatility_pct / Decimal::ONE_HUNDRED)
            .to_f64()
            .unwrap_or(0.0);
        let catalogue = black_swan::catalogue();

        let mut events = Vec::new();
        let mut perturbed = Vec::with_capacity(rows.len());
        for row in rows {
            let mut income_factor = Decimal::from_f64(rng.factor(income_vol))
                .unwrap_or(Decimal::ONE)
                .max(settings.income_minimum_factor);
            let mut expense_factor = Decimal::from_f64(rng.factor(expense_vol))
                .unwrap_or(Decimal::ONE)
                .max(settings.expense_minimum_factor);
            let mut one_time_cost = Decimal::ZERO;

            if settings.include_black_swan_events {
                for event in &catalogue {
                    if rng.uniform() < event.annual_probability {
                        // Shocks bypass the volatility floors on purpose.
                        income_factor *= event.income_multiplier;
                        expense_factor *= event.expense_multiplier;
                        one_time_cost += event.one_time_cost;
                        events.push(event.kind);
                    }
                }
            }

            perturbed.push(AnnualProjectionRow {
                age: row.age,
                year: row.year,
                total_income: row.total_income * income_factor,
                total_expense: row.total_expense * expense_factor + one_time_cost,
            });
        }

        let result = self.engine.calculate(profile, &perturbed).ok()?;

        let statuses: Vec<PlanStatus> = result
            .years
            .iter()
            .map(|state| {
                if state.net_worth < Decimal::ZERO {
                    PlanStatus::Danger
                } else {
                    let required = self.engine.required_safety_buffer(
                        profile,
                        state.age,
                        state.total_expense,
                    );
                    if state.net_worth < required {
                        PlanStatus::Warning
                    } else {
                        PlanStatus::Safe
                    }
                }
            })
            .collect();

        let plan_status = result
            .years
            .iter()
            .zip(&statuses)
            .filter(|(state, _)| state.age >= profile.expected_fire_age)
            .map(|(_, status)| *status)
            .max()
            .unwrap_or(PlanStatus::Safe);

        let min_net_worth = result
            .years
            .iter()
            .map(|state| state.net_worth)
            .min()
            .unwrap_or(Decimal::ZERO);

        Some(TrialOutcome {
            achievable: result.is_fire_achievable,
            min_net_worth,
            statuses,
            plan_status,
            events,
        })
    }

    fn aggregate(
        &self,
        _profile: &UserProfile,
        rows: &[AnnualProjectionRow],
        settings: &SimulationSettings,
        outcomes: Vec<TrialOutcome>,
        skipped: u32,
    ) -> Result<MonteCarloResult, SimulationError> {
        let completed = outcomes.len() as u32;
        if completed == 0 {
            return Err(SimulationError::NoCompletedTrials { skipped });
        }
        let completed_dec = Decimal::from(completed);

        let successes = outcomes.iter().filter(|o| o.achievable).count();
        let success_rate = Decimal::from(successes) / completed_dec;

        let mut minima: Vec<Decimal> = outcomes.iter().map(|o| o.min_net_worth).collect();
        minima.sort();
        let mean = statistics::mean(&minima);

        let plan_rates = {
            let mut safe = 0u32;
            let mut warning = 0u32;
            let mut danger = 0u32;
            for outcome in &outcomes {
                match outcome.plan_status {
                    PlanStatus::Safe => safe += 1,
                    PlanStatus::Warning => warning += 1,
                    PlanStatus::Danger => danger += 1,
                }
            }
            StatusRates {
                safe: Decimal::from(safe) / completed_dec,
                warning: Decimal::from(warning) / completed_dec,
                danger: Decimal::from(danger) / completed_dec,
            }
        };

        let mut yearly_rates = BTreeMap::new();
        for (idx, row) in rows.iter().enumerate() {
            let mut safe = 0u32;
            let mut warning = 0u32;
            let mut danger = 0u32;
            for outcome in &outcomes {
                match outcome.statuses[idx] {
                    PlanStatus::Safe => safe += 1,
                    PlanStatus::Warning => warning += 1,
                    PlanStatus::Danger => danger += 1,
                }
            }
            yearly_rates.insert(
                row.age,
                StatusRates {
                    safe: Decimal::from(safe) / completed_dec,
                    warning: Decimal::from(warning) / completed_dec,
                    danger: Decimal::from(danger) / completed_dec,
                },
            );
        }

        let black_swan_impact = if settings.include_black_swan_events {
            let mut event_counts: BTreeMap<BlackSwanKind, u64> = black_swan::catalogue()
                .iter()
                .map(|event| (event.kind, 0))
                .collect();
            let mut total_events = 0u64;
            for outcome in &outcomes {
                for kind in &outcome.events {
                    total_events += 1;
                    *event_counts.entry(*kind).or_insert(0) += 1;
                }
            }
            Some(BlackSwanImpact {
                total_events,
                average_events_per_trial: Decimal::from(total_events) / completed_dec,
                event_counts,
            })
        } else {
            None
        };

        Ok(MonteCarloResult {
            success_rate,
            success_rate_ci_half_width: statistics::binomial_ci_half_width(
                success_rate,
                completed,
                settings.confidence_level,
            ),
            mean_min_net_worth: mean,
            percentile_5: statistics::percentile(&minima, Decimal::from(5)),
            percentile_25: statistics::percentile(&minima, Decimal::from(25)),
            median: statistics::percentile(&minima, Decimal::from(50)),
            percentile_75: statistics::percentile(&minima, Decimal::from(75)),
            percentile_95: statistics::percentile(&minima, Decimal::from(95)),
            std_dev_min_net_worth: statistics::std_dev(&minima, mean),
            plan_status_rates: Some(plan_rates),
            yearly_status_rates: Some(yearly_rates),
            black_swan_impact,
            completed_trials: completed,
            skipped_trials: skipped,
        })
    }
}

impl Default for MonteCarloSimulator {
    fn default() -> Self {
        Self::new()
    }
}
