use crate::error::ProjectionError;
use core_types::{AnnualProjectionRow, FlowKind, Frequency, IncomeExpenseItem, Override, UserProfile};
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// The annual amount an item contributes in the year the household turns
/// `age`.
///
/// Amounts are stated in start-age money. Recurring income items compound
/// their own growth rate from `start_age`; recurring expense items compound
/// their growth rate together with the household inflation rate, so the
/// projected cost of living (and with it the FIRE number) rises over time.
/// One-time items pay their amount exactly once at `start_age`, with the
/// time unit ignored.
pub fn annual_amount_at(profile: &UserProfile, item: &IncomeExpenseItem, age: u32) -> Decimal {
    if age < item.start_age {
        return Decimal::ZERO;
    }

    match item.frequency {
        Frequency::OneTime => {
            if age == item.start_age {
                item.amount
            } else {
                Decimal::ZERO
            }
        }
        Frequency::Recurring => {
            if let Some(end_age) = item.end_age {
                if age > end_age {
                    return Decimal::ZERO;
                }
            }
            let base = item.amount * item.time_unit.annual_factor();
            let growth = Decimal::ONE + item.growth_rate_pct / dec!(100);
            let factor = match item.flow {
                FlowKind::Income => growth,
                FlowKind::Expense => {
                    growth * (Decimal::ONE + profile.inflation_rate_pct / dec!(100))
                }
            };
            base * factor.powi((age - item.start_age) as i64)
        }
    }
}

/// Aggregates the items into one [`AnnualProjectionRow`] per age, from the
/// household's age in `as_of_year` through its life expectancy.
pub fn build_annual_rows(
    profile: &UserProfile,
    items: &[IncomeExpenseItem],
    as_of_year: i32,
) -> Result<Vec<AnnualProjectionRow>, ProjectionError> {
    profile.validate()?;
    for item in items {
        item.validate()?;
    }

    let current_age = profile.current_age(as_of_year);
    if current_age > profile.life_expectancy {
        return Err(ProjectionError::HorizonExhausted {
            current: current_age,
            horizon: profile.life_expectancy,
        });
    }

    let mut rows = Vec::with_capacity((profile.life_expectancy - current_age + 1) as usize);
    for age in current_age..=profile.life_expectancy {
        let mut total_income = Decimal::ZERO;
        let mut total_expense = Decimal::ZERO;
        for item in items {
            let amount = annual_amount_at(profile, item, age);
            match item.flow {
                FlowKind::Income => total_income += amount,
                FlowKind::Expense => total_expense += amount,
            }
        }
        rows.push(AnnualProjectionRow {
            age,
            year: profile.year_at_age(age),
            total_income,
            total_expense,
        });
    }
    Ok(rows)
}

/// Applies manual overrides onto a base set of rows, yielding the rows
/// actually fed to the engine, the advisor and the simulator.
///
/// Each override replaces one item's computed annual contribution for one
/// age; no other (age, item) cell is touched. When several overrides target
/// the same cell, the last one wins.
pub fn apply_overrides(
    profile: &UserProfile,
    rows: &[AnnualProjectionRow],
    items: &[IncomeExpenseItem],
    overrides: &[Override],
) -> Result<Vec<AnnualProjectionRow>, ProjectionError> {
    let mut effective: BTreeMap<(u32, &str), &Override> = BTreeMap::new();
    for ov in overrides {
        ov.validate()?;
        effective.insert((ov.age, ov.item_id.as_str()), ov);
    }

    let mut out = rows.to_vec();
    for ov in effective.into_values() {
        let item = items
            .iter()
            .find(|item| item.id == ov.item_id)
            .ok_or_else(|| ProjectionError::UnknownOverrideTarget {
                item_id: ov.item_id.clone(),
                age: ov.age,
            })?;
        let row = out
            .iter_mut()
            .find(|row| row.age == ov.age)
            .ok_or_else(|| ProjectionError::UnknownOverrideTarget {
                item_id: ov.item_id.clone(),
                age: ov.age,
            })?;

        let computed = annual_amount_at(profile, item, ov.age);
        match item.flow {
            FlowKind::Income => row.total_income += ov.annual_amount - computed,
            FlowKind::Expense => row.total_expense += ov.annual_amount - computed,
        }
    }
    Ok(out)
}
