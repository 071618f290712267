//! Shared rounding and comparison helpers for the calculators.

use rust_decimal::Decimal;

/// Rounds a decimal value to exactly two decimal places using half-up
/// rounding (midpoint away from zero), the standard financial convention.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fedtax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454)), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455)), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-123.455)), dec!(-123.46)); // Away from zero
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a decimal value to the nearest multiple of ten dollars, the
/// convention used when figuring reduced IRA limits and similar phased
/// amounts.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fedtax_core::calculations::common::round_to_ten;
///
/// assert_eq!(round_to_ten(dec!(4663)), dec!(4660));
/// assert_eq!(round_to_ten(dec!(4665)), dec!(4670));
/// assert_eq!(round_to_ten(dec!(4667.50)), dec!(4670));
/// ```
pub fn round_to_ten(value: Decimal) -> Decimal {
    let ten = Decimal::from(10);
    (value / ten).round_dp_with_strategy(0, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
        * ten
}

/// Returns the maximum of two decimal values.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fedtax_core::calculations::common::max;
///
/// assert_eq!(max(dec!(100.00), dec!(200.00)), dec!(200.00));
/// assert_eq!(max(dec!(-100.00), dec!(-200.00)), dec!(-100.00));
/// ```
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}
