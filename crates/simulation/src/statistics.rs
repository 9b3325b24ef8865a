use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

pub fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}

/// Population standard deviation.
pub fn std_dev(values: &[Decimal], mean: Decimal) -> Decimal {
    if values.len() < 2 {
        return Decimal::ZERO;
    }
    let variance = values
        .iter()
        .map(|v| (*v - mean) * (*v - mean))
        .sum::<Decimal>()
        / Decimal::from(values.len());
    variance.sqrt().unwrap_or(Decimal::ZERO)
}

/// Percentile of an ascending-sorted slice by linear interpolation:
/// `pos = p/100 * (n-1)`, and the value is interpolated between the two
/// neighbouring ranks by the fractional part of `pos`.
pub fn percentile(sorted: &[Decimal], p: Decimal) -> Decimal {
    match sorted.len() {
        0 => Decimal::ZERO,
        1 => sorted[0],
        n => {
            let pos = p.clamp(Decimal::ZERO, dec!(100)) / dec!(100) * Decimal::from(n - 1);
            let lo = pos.floor();
            let lo_idx = lo.to_usize().unwrap_or(0).min(n - 1);
            let frac = pos - lo;
            if frac.is_zero() || lo_idx + 1 >= n {
                sorted[lo_idx]
            } else {
                sorted[lo_idx] + (sorted[lo_idx + 1] - sorted[lo_idx]) * frac
            }
        }
    }
}

/// Two-sided normal z-value for the given confidence level. Levels outside
/// the common table fall back to the 95% value.
pub fn z_value(confidence_level: Decimal) -> Decimal {
    if confidence_level >= dec!(0.99) {
        dec!(2.576)
    } else if confidence_level >= dec!(0.95) {
        dec!(1.96)
    } else if confidence_level >= dec!(0.90) {
        dec!(1.645)
    } else if confidence_level >= dec!(0.80) {
        dec!(1.282)
    } else {
        dec!(1.96)
    }
}

/// Half-width of the normal-approximation confidence interval for an
/// observed success rate over `n` trials.
pub fn binomial_ci_half_width(rate: Decimal, n: u32, confidence_level: Decimal) -> Decimal {
    if n == 0 {
        return Decimal::ZERO;
    }
    let rate = rate.clamp(Decimal::ZERO, Decimal::ONE);
    let variance = rate * (Decimal::ONE - rate) / Decimal::from(n);
    z_value(confidence_level) * variance.sqrt().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn percentile_interpolates_linearly() {
        let values = vec![dec!(0), dec!(10), dec!(20), dec!(30), dec!(40)];
        assert_eq!(percentile(&values, dec!(0)), dec!(0));
        assert_eq!(percentile(&values, dec!(50)), dec!(20));
        assert_eq!(percentile(&values, dec!(100)), dec!(40));
        // pos = 0.05 * 4 = 0.2 -> 0 + 0.2 * 10
        assert_eq!(percentile(&values, dec!(5)), dec!(2));
        // pos = 0.75 * 4 = 3.0 -> exactly rank 3
        assert_eq!(percentile(&values, dec!(75)), dec!(30));
    }

    #[test]
    fn degenerate_inputs() {
        assert_eq!(percentile(&[], dec!(50)), Decimal::ZERO);
        assert_eq!(percentile(&[dec!(7)], dec!(95)), dec!(7));
        assert_eq!(mean(&[]), Decimal::ZERO);
        assert_eq!(std_dev(&[dec!(1)], dec!(1)), Decimal::ZERO);
    }

    #[test]
    fn std_dev_of_a_known_sample() {
        let values = vec![dec!(2), dec!(4), dec!(4), dec!(4), dec!(5), dec!(5), dec!(7), dec!(9)];
        let m = mean(&values);
        assert_eq!(m, dec!(5));
        let sd = std_dev(&values, m);
        assert!((sd - dec!(2)).abs() < dec!(0.000001), "got {sd}");
    }

    #[test]
    fn z_values_grow_with_confidence() {
        assert_eq!(z_value(dec!(0.80)), dec!(1.282));
        assert_eq!(z_value(dec!(0.90)), dec!(1.645));
        assert_eq!(z_value(dec!(0.95)), dec!(1.96));
        assert_eq!(z_value(dec!(0.99)), dec!(2.576));
        assert_eq!(z_value(dec!(0.5)), dec!(1.96));
    }

    proptest! {
        #[test]
        fn percentiles_are_ordered(mut raw in prop::collection::vec(-1_000_000i64..1_000_000, 100..400)) {
            let mut values: Vec<Decimal> = raw.drain(..).map(Decimal::from).collect();
            values.sort();
            let p5 = percentile(&values, dec!(5));
            let p25 = percentile(&values, dec!(25));
            let p50 = percentile(&values, dec!(50));
            let p75 = percentile(&values, dec!(75));
            let p95 = percentile(&values, dec!(95));
            prop_assert!(p5 <= p25);
            prop_assert!(p25 <= p50);
            prop_assert!(p50 <= p75);
            prop_assert!(p75 <= p95);
        }
    }
}
