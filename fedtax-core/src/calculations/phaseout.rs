//! Linear phaseout of a benefit between an income start and end threshold.
//!
//! Several deductions and credits reduce linearly to zero across a
//! MAGI band that depends on filing status. The reduction itself is always
//! the same interpolation; what differs per rule is the rounding convention,
//! so the rounding is a parameter chosen by the calling rule.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fedtax_core::PhaseoutRange;
//! use fedtax_core::calculations::{phase_out, PhaseoutRounding};
//!
//! let range = PhaseoutRange::new(dec!(85000), dec!(100000)).unwrap();
//!
//! // Below the band: full benefit.
//! assert_eq!(
//!     phase_out(dec!(2500), dec!(80000), &range, PhaseoutRounding::Cents),
//!     dec!(2500)
//! );
//!
//! // Halfway through the band: half the benefit.
//! assert_eq!(
//!     phase_out(dec!(2500), dec!(92500), &range, PhaseoutRounding::Cents),
//!     dec!(1250)
//! );
//!
//! // At or past the end: nothing remains.
//! assert_eq!(
//!     phase_out(dec!(2500), dec!(100000), &range, PhaseoutRounding::Cents),
//!     dec!(0)
//! );
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{round_half_up, round_to_ten};
use crate::models::PhaseoutRange;

/// Rounding convention applied to the interpolated remainder, chosen by the
/// rule invoking the phaseout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseoutRounding {
    /// Round to cents. Used where the rule states no special convention
    /// (e.g. the student loan interest deduction, AMT exemption).
    Cents,

    /// Round to the nearest ten dollars.
    NearestTen,

    /// Round to the nearest ten dollars, but never below `floor` while the
    /// benefit is only partially phased out. The IRA-limit convention: a
    /// filer inside the band keeps at least $200.
    NearestTenWithFloor(Decimal),
}

/// Remaining benefit after the linear phaseout.
///
/// Pure function of its inputs: `amount` unchanged at or below the band,
/// zero at or above it, linearly interpolated in between. A zero-width band
/// acts as a step function at its start. Negative amounts are rejected
/// upstream by model validation; the math here assumes `amount >= 0`.
pub fn phase_out(
    amount: Decimal,
    magi: Decimal,
    range: &PhaseoutRange,
    rounding: PhaseoutRounding,
) -> Decimal {
    if magi <= range.start() {
        return amount;
    }
    if magi >= range.end() {
        // Also covers the zero-width band, which would otherwise divide by
        // zero below.
        debug!(%magi, start = %range.start(), end = %range.end(), "benefit fully phased out");
        return Decimal::ZERO;
    }

    let excess_fraction = (magi - range.start()) / range.width();
    let remaining = amount * (Decimal::ONE - excess_fraction);

    match rounding {
        PhaseoutRounding::Cents => round_half_up(remaining),
        PhaseoutRounding::NearestTen => round_to_ten(remaining),
        PhaseoutRounding::NearestTenWithFloor(floor) => {
            let rounded = round_to_ten(remaining);
            if rounded < floor { floor } else { rounded }
        }
    }
}
