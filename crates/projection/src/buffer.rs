use core_types::UserProfile;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Supplies the required safety-buffer length for a given year of the
/// projection.
///
/// The engine treats this as an injected policy so callers can swap in
/// their own view of how much cushion a retirement year needs.
pub trait BufferPolicy: Send + Sync {
    /// Required buffer length at `age`, in months of that year's expenses.
    fn required_buffer_months(&self, age: u32, profile: &UserProfile) -> Decimal;
}

/// Default policy: during the bridge period between early retirement and
/// legal retirement there is no pension income yet, so the base buffer is
/// scaled up by `premium_pct`. Outside the bridge the base months apply.
#[derive(Debug, Clone)]
pub struct BridgeBufferPolicy {
    /// Extra buffer demanded during the bridge period, in percent of the
    /// base buffer length.
    pub premium_pct: Decimal,
}

impl Default for BridgeBufferPolicy {
    fn default() -> Self {
        Self {
            premium_pct: dec!(50),
        }
    }
}

impl BufferPolicy for BridgeBufferPolicy {
    fn required_buffer_months(&self, age: u32, profile: &UserProfile) -> Decimal {
        let base = profile.safety_buffer_months;
        if age >= profile.expected_fire_age && age < profile.legal_retirement_age {
            base * (Decimal::ONE + self.premium_pct / dec!(100))
        } else {
            base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bridge_years_carry_a_premium() {
        let profile = UserProfile::default(); // FIRE 45, legal 67, buffer 6 months
        let policy = BridgeBufferPolicy::default();

        assert_eq!(policy.required_buffer_months(44, &profile), dec!(6));
        assert_eq!(policy.required_buffer_months(45, &profile), dec!(9));
        assert_eq!(policy.required_buffer_months(66, &profile), dec!(9));
        assert_eq!(policy.required_buffer_months(67, &profile), dec!(6));
        assert_eq!(policy.required_buffer_months(80, &profile), dec!(6));
    }
}
