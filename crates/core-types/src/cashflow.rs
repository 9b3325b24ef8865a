use crate::enums::{Category, FlowKind, Frequency, TimeUnit};
use crate::error::CoreError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Upper bound for any age carried by an item or override.
pub const MAX_ITEM_AGE: u32 = 150;

/// A single dated income or expense item.
///
/// Items are immutable once they have been used to build a projection;
/// an edit produces a new item with a new identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomeExpenseItem {
    pub id: String,
    pub name: String,
    /// After-tax amount per `time_unit` period, stated in start-age money.
    pub amount: Decimal,
    #[serde(default)]
    pub time_unit: TimeUnit,
    #[serde(default)]
    pub frequency: Frequency,
    /// First age (inclusive) at which the item applies.
    pub start_age: u32,
    /// Last age (inclusive); `None` means the item runs to the end of the
    /// projection horizon. Ignored for one-time items.
    #[serde(default)]
    pub end_age: Option<u32>,
    /// Annual growth rate of the amount, in percent.
    #[serde(default)]
    pub growth_rate_pct: Decimal,
    #[serde(default)]
    pub flow: FlowKind,
    #[serde(default)]
    pub category: Category,
}

impl IncomeExpenseItem {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        amount: Decimal,
        time_unit: TimeUnit,
        frequency: Frequency,
        start_age: u32,
        end_age: Option<u32>,
        growth_rate_pct: Decimal,
        flow: FlowKind,
        category: Category,
    ) -> Result<Self, CoreError> {
        let item = Self {
            id: id.into(),
            name: name.into(),
            amount,
            time_unit,
            frequency,
            start_age,
            end_age,
            growth_rate_pct,
            flow,
            category,
        };
        item.validate()?;
        Ok(item)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.id.trim().is_empty() {
            return Err(CoreError::Validation(
                "item.id".to_string(),
                "identifier must not be empty".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation(
                format!("item '{}'", self.id),
                "display name must not be empty".to_string(),
            ));
        }
        if self.amount < Decimal::ZERO {
            return Err(CoreError::Validation(
                format!("item '{}'", self.id),
                "amount must not be negative; use the expense flag instead".to_string(),
            ));
        }
        if self.start_age > MAX_ITEM_AGE {
            return Err(CoreError::Validation(
                format!("item '{}'", self.id),
                format!("start_age must be in [0, {MAX_ITEM_AGE}]"),
            ));
        }
        if let Some(end_age) = self.end_age {
            if end_age > MAX_ITEM_AGE {
                return Err(CoreError::Validation(
                    format!("item '{}'", self.id),
                    format!("end_age must be in [0, {MAX_ITEM_AGE}]"),
                ));
            }
            if end_age < self.start_age {
                return Err(CoreError::Validation(
                    format!("item '{}'", self.id),
                    "end_age must not precede start_age".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// A manual correction layered onto a computed projection: for the given
/// age, the item's computed annual amount is replaced by `annual_amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Override {
    pub age: u32,
    pub item_id: String,
    /// Replacement annual amount for the (age, item) cell.
    pub annual_amount: Decimal,
}

impl Override {
    pub fn new(
        age: u32,
        item_id: impl Into<String>,
        annual_amount: Decimal,
    ) -> Result<Self, CoreError> {
        let ov = Self {
            age,
            item_id: item_id.into(),
            annual_amount,
        };
        ov.validate()?;
        Ok(ov)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.age > MAX_ITEM_AGE {
            return Err(CoreError::Validation(
                "override.age".to_string(),
                format!("must be in [0, {MAX_ITEM_AGE}]"),
            ));
        }
        if self.item_id.trim().is_empty() {
            return Err(CoreError::Validation(
                "override.item_id".to_string(),
                "identifier must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Aggregated per-year cash-flow totals fed to the projection engine.
/// Derived from items plus overrides; never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualProjectionRow {
    pub age: u32,
    pub year: i32,
    pub total_income: Decimal,
    pub total_expense: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn salary() -> IncomeExpenseItem {
        IncomeExpenseItem::new(
            "salary",
            "Salary",
            dec!(4000),
            TimeUnit::Monthly,
            Frequency::Recurring,
            30,
            Some(45),
            dec!(2.0),
            FlowKind::Income,
            Category::Salary,
        )
        .expect("valid item")
    }

    #[test]
    fn valid_item_constructs() {
        let item = salary();
        assert_eq!(item.id, "salary");
        assert_eq!(item.time_unit.annual_factor(), dec!(12));
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let mut item = salary();
        item.id = "  ".to_string();
        assert!(matches!(item.validate(), Err(CoreError::Validation(..))));
    }

    #[test]
    fn out_of_range_ages_are_rejected() {
        let mut item = salary();
        item.start_age = 151;
        assert!(item.validate().is_err());

        let mut item = salary();
        item.end_age = Some(20);
        assert!(item.validate().is_err());
    }

    #[test]
    fn override_validation() {
        assert!(Override::new(40, "salary", dec!(10000)).is_ok());
        assert!(Override::new(151, "salary", dec!(10000)).is_err());
        assert!(Override::new(40, "", dec!(10000)).is_err());
    }
}
