use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    EarlyRetirement,
    DelayedRetirement,
    DelayedRetirementNotFeasible,
    IncreaseIncome,
    ReduceExpenses,
}

/// The parameter values a recommendation proposes; only the fields relevant
/// to its kind are populated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_increase_pct: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_reduction_pct: Option<Decimal>,
}

/// One actionable adjustment produced by the advisor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub params: RecommendationParams,
    pub is_achievable: bool,
    /// Filled by callers that re-run the Monte Carlo simulator on the
    /// recommended parameters; the advisor itself leaves it empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monte_carlo_success_rate: Option<Decimal>,
}

impl Recommendation {
    pub fn new(kind: RecommendationKind, params: RecommendationParams, is_achievable: bool) -> Self {
        Self {
            kind,
            params,
            is_achievable,
            monte_carlo_success_rate: None,
        }
    }
}
