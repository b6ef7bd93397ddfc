//! Shared helpers for the tax calculations.
//!
//! The calculations themselves keep full precision; rounding to cents is a
//! presentation concern and happens only through [`round_half_up`].

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use genie_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(5842.362)), dec!(5842.36));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the maximum of two decimal values.
///
/// ```
/// use rust_decimal_macros::dec;
/// use genie_core::calculations::common::max;
///
/// assert_eq!(max(dec!(-250.00), dec!(0)), dec!(0));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Divides `numerator` by `denominator`, returning zero for a zero denominator.
pub fn ratio_or_zero(
    numerator: Decimal,
    denominator: Decimal,
) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Expresses a fractional rate as a percentage with two decimal places.
///
/// ```
/// use rust_decimal_macros::dec;
/// use genie_core::calculations::common::as_percent;
///
/// assert_eq!(as_percent(dec!(0.19456362)), dec!(19.46));
/// ```
pub fn as_percent(rate: Decimal) -> Decimal {
    round_half_up(rate * Decimal::ONE_HUNDRED)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(1543.635)), dec!(1543.64));
    }

    #[test]
    fn round_half_up_rounds_negative_away_from_zero() {
        assert_eq!(round_half_up(dec!(-1543.635)), dec!(-1543.64));
    }

    #[test]
    fn round_half_up_handles_large_values() {
        assert_eq!(round_half_up(dec!(999999.999)), dec!(1000000.00));
    }

    // =========================================================================
    // max tests
    // =========================================================================

    #[test]
    fn max_returns_larger_value() {
        assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
        assert_eq!(max(dec!(200.00), dec!(100.00)), dec!(200.00));
    }

    #[test]
    fn max_clamps_negative_to_zero() {
        assert_eq!(max(dec!(-50.00), Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // ratio_or_zero / as_percent tests
    // =========================================================================

    #[test]
    fn ratio_or_zero_divides() {
        assert_eq!(ratio_or_zero(dec!(25000), dec!(100000)), dec!(0.25));
    }

    #[test]
    fn ratio_or_zero_returns_zero_for_zero_denominator() {
        assert_eq!(ratio_or_zero(dec!(25000), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn as_percent_scales_and_rounds() {
        assert_eq!(as_percent(dec!(0.0765)), dec!(7.65));
        assert_eq!(as_percent(Decimal::ZERO), dec!(0.00));
    }
}
