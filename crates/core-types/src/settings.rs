use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Parameters for a Monte Carlo simulation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Number of independent trials to run.
    pub num_simulations: u32,
    /// Confidence level for the success-rate interval (e.g. `0.95`).
    pub confidence_level: Decimal,
    /// Whether rare shock events are injected into trials.
    pub include_black_swan_events: bool,
    /// Standard deviation of the yearly income perturbation factor, in
    /// percent (e.g. `10.0` means factors drawn from Normal(1.0, 0.10)).
    pub income_base_volatility_pct: Decimal,
    /// Floor applied to the income perturbation factor.
    pub income_minimum_factor: Decimal,
    /// Standard deviation of the yearly expense perturbation factor, in percent.
    pub expense_base_volatility_pct: Decimal,
    /// Floor applied to the expense perturbation factor.
    pub expense_minimum_factor: Decimal,
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.num_simulations == 0 {
            return Err(CoreError::Validation(
                "num_simulations".to_string(),
                "must be at least 1".to_string(),
            ));
        }
        if self.confidence_level <= Decimal::ZERO || self.confidence_level >= Decimal::ONE {
            return Err(CoreError::Validation(
                "confidence_level".to_string(),
                "must lie strictly between 0 and 1".to_string(),
            ));
        }
        for (name, vol) in [
            ("income_base_volatility_pct", self.income_base_volatility_pct),
            ("expense_base_volatility_pct", self.expense_base_volatility_pct),
        ] {
            if vol < Decimal::ZERO {
                return Err(CoreError::Validation(
                    name.to_string(),
                    "must not be negative".to_string(),
                ));
            }
        }
        for (name, floor) in [
            ("income_minimum_factor", self.income_minimum_factor),
            ("expense_minimum_factor", self.expense_minimum_factor),
        ] {
            if floor <= Decimal::ZERO || floor > Decimal::ONE {
                return Err(CoreError::Validation(
                    name.to_string(),
                    "must lie in (0, 1]".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            confidence_level: dec!(0.95),
            include_black_swan_events: true,
            income_base_volatility_pct: dec!(10.0),
            income_minimum_factor: dec!(0.5),
            expense_base_volatility_pct: dec!(5.0),
            expense_minimum_factor: dec!(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        SimulationSettings::default().validate().expect("valid");
    }

    #[test]
    fn zero_trials_rejected() {
        let mut settings = SimulationSettings::default();
        settings.num_simulations = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn confidence_level_bounds() {
        let mut settings = SimulationSettings::default();
        settings.confidence_level = dec!(1);
        assert!(settings.validate().is_err());
        settings.confidence_level = dec!(0);
        assert!(settings.validate().is_err());
    }

    #[test]
    fn factor_floor_bounds() {
        let mut settings = SimulationSettings::default();
        settings.income_minimum_factor = dec!(0);
        assert!(settings.validate().is_err());
        settings.income_minimum_factor = dec!(1.5);
        assert!(settings.validate().is_err());
    }
}
