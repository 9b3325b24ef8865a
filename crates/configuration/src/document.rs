use crate::error::ConfigError;
use core_types::{
    FlowKind, IncomeExpenseItem, Override, SimulationSettings, UserProfile,
};
use serde::Deserialize;
use std::collections::HashSet;

/// The structured input document consumed from the outside world.
///
/// Every section is optional: a missing profile falls back to the default
/// profile (born 1990, FIRE at 45, legal retirement at 67, horizon 90, a
/// 60/30/10 portfolio), missing item arrays are empty, and missing
/// simulation settings use 1000 trials at a 0.95 confidence level.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct InputDocument {
    pub profile: UserProfile,
    pub income_items: Vec<IncomeExpenseItem>,
    pub expense_items: Vec<IncomeExpenseItem>,
    pub overrides: Vec<Override>,
    pub simulation_settings: SimulationSettings,
}

/// The validated inputs handed to the engine, advisor and simulator.
#[derive(Debug, Clone)]
pub struct ResolvedInputs {
    pub profile: UserProfile,
    pub items: Vec<IncomeExpenseItem>,
    pub overrides: Vec<Override>,
    pub settings: SimulationSettings,
}

impl InputDocument {
    /// Validates every section and merges the item arrays, stamping each
    /// item's flow from the array it was listed under.
    pub fn resolve(self) -> Result<ResolvedInputs, ConfigError> {
        self.profile.validate()?;
        self.simulation_settings.validate()?;

        let mut items = Vec::with_capacity(self.income_items.len() + self.expense_items.len());
        let mut seen = HashSet::new();
        let stamped = self
            .income_items
            .into_iter()
            .map(|item| (item, FlowKind::Income))
            .chain(
                self.expense_items
                    .into_iter()
                    .map(|item| (item, FlowKind::Expense)),
            );
        for (mut item, flow) in stamped {
            item.flow = flow;
            item.validate()?;
            if !seen.insert(item.id.clone()) {
                return Err(ConfigError::DuplicateItemId(item.id));
            }
            items.push(item);
        }

        for ov in &self.overrides {
            ov.validate()?;
        }

        Ok(ResolvedInputs {
            profile: self.profile,
            items,
            overrides: self.overrides,
            settings: self.simulation_settings,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn parse(toml: &str) -> InputDocument {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .expect("builds")
            .try_deserialize()
            .expect("deserializes")
    }

    #[test]
    fn empty_document_resolves_to_the_documented_defaults() {
        let resolved = parse("").resolve().expect("resolves");
        assert_eq!(resolved.profile.expected_fire_age, 45);
        assert_eq!(resolved.profile.legal_retirement_age, 67);
        assert_eq!(resolved.profile.portfolio.assets.len(), 3);
        assert_eq!(resolved.settings.num_simulations, 1000);
        assert_eq!(resolved.settings.confidence_level, dec!(0.95));
        assert!(resolved.items.is_empty());
        assert!(resolved.overrides.is_empty());
    }

    #[test]
    fn partial_profile_keeps_defaults_for_the_rest() {
        let resolved = parse(
            r#"
            [profile]
            birth_year = 1985
            expected_fire_age = 50
            current_net_worth = 250000
            "#,
        )
        .resolve()
        .expect("resolves");

        assert_eq!(resolved.profile.birth_year, 1985);
        assert_eq!(resolved.profile.expected_fire_age, 50);
        assert_eq!(resolved.profile.current_net_worth, dec!(250000));
        // Untouched fields come from the default profile.
        assert_eq!(resolved.profile.life_expectancy, 90);
        assert_eq!(resolved.profile.inflation_rate_pct, dec!(2.0));
    }

    #[test]
    fn items_are_stamped_with_the_flow_of_their_array() {
        let resolved = parse(
            r#"
            [[income_items]]
            id = "salary"
            name = "Salary"
            amount = 4000
            start_age = 30

            [[expense_items]]
            id = "living"
            name = "Living costs"
            amount = 2000
            start_age = 0
            flow = "income"
            "#,
        )
        .resolve()
        .expect("resolves");

        assert_eq!(resolved.items.len(), 2);
        assert_eq!(resolved.items[0].flow, FlowKind::Income);
        // The array wins over whatever the document claimed.
        assert_eq!(resolved.items[1].flow, FlowKind::Expense);
    }

    #[test]
    fn duplicate_item_ids_are_rejected() {
        let result = parse(
            r#"
            [[income_items]]
            id = "x"
            name = "A"
            amount = 1
            start_age = 0

            [[expense_items]]
            id = "x"
            name = "B"
            amount = 1
            start_age = 0
            "#,
        )
        .resolve();
        assert!(matches!(result, Err(ConfigError::DuplicateItemId(_))));
    }

    #[test]
    fn invalid_profile_is_rejected_on_resolve() {
        let result = parse(
            r#"
            [profile]
            expected_fire_age = 80
            legal_retirement_age = 67
            "#,
        )
        .resolve();
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }
}
