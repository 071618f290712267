use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Standard deduction amounts for one year and filing status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardDeduction {
    pub tax_year: i32,
    pub filing_status_id: i32,
    pub base_amount: Decimal,
    /// Additional amount per age-65/blindness condition.
    pub additional_amount: Decimal,
}
