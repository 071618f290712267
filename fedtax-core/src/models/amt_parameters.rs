use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// AMT exemption and rate-tier parameters for one year and filing status.
///
/// The phaseout end is stored as `phaseout_start + 4 × exemption`, so the
/// linear phaseout reduces the exemption by 25 cents per dollar of AMTI over
/// the start, matching the statutory schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtParameters {
    pub tax_year: i32,
    pub filing_status_id: i32,
    pub exemption: Decimal,
    pub phaseout_start: Decimal,
    pub phaseout_end: Decimal,
    /// AMT base above which the high rate applies.
    pub rate_breakpoint: Decimal,
}
