use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Taxable-income breakpoints for the preferential rate tiers, per year and
/// filing status. Preferential income below `zero_rate_max` (after stacking
/// on ordinary income) is untaxed; between the two thresholds it takes the
/// middle rate; above `fifteen_rate_max` the top rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapitalGainsThresholds {
    pub tax_year: i32,
    pub filing_status_id: i32,
    pub zero_rate_max: Decimal,
    pub fifteen_rate_max: Decimal,
}
