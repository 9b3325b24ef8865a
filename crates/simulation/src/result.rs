use crate::black_swan::BlackSwanKind;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Risk classification of a single projected year within a trial.
///
/// Ordered from best to worst so that `max` picks the worst status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Net worth covers the required safety buffer.
    Safe,
    /// Solvent, but below the required safety buffer.
    Warning,
    /// Net worth is negative.
    Danger,
}

/// Fractions of trials in each status; the three values sum to 1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusRates {
    pub safe: Decimal,
    pub warning: Decimal,
    pub danger: Decimal,
}

/// Summary of the shocks injected across a batch, present only when black
/// swan events were enabled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlackSwanImpact {
    pub total_events: u64,
    pub average_events_per_trial: Decimal,
    pub event_counts: BTreeMap<BlackSwanKind, u64>,
}

/// Aggregated outcome of a Monte Carlo batch.
///
/// The distribution statistics are computed over the per-trial minimum net
/// worth across the full horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonteCarloResult {
    /// Fraction of completed trials whose plan was achievable.
    pub success_rate: Decimal,
    /// Half-width of the success-rate confidence interval at the configured
    /// confidence level (normal approximation).
    pub success_rate_ci_half_width: Decimal,
    pub mean_min_net_worth: Decimal,
    pub percentile_5: Decimal,
    pub percentile_25: Decimal,
    pub median: Decimal,
    pub percentile_75: Decimal,
    pub percentile_95: Decimal,
    pub std_dev_min_net_worth: Decimal,
    /// Fraction of trials whose worst post-FIRE year landed in each status.
    pub plan_status_rates: Option<StatusRates>,
    /// Per-age fractions of trials in each status, for every projected age.
    pub yearly_status_rates: Option<BTreeMap<u32, StatusRates>>,
    pub black_swan_impact: Option<BlackSwanImpact>,
    pub completed_trials: u32,
    /// Trials excluded from aggregation after a degenerate perturbation.
    pub skipped_trials: u32,
}
