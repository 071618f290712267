use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A persisted computation run: the key inputs and outputs of one
/// `calculate` call, for listing and review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedComputation {
    pub id: i64,
    pub tax_year: i32,
    pub filing_status_id: i32,

    pub gross_income: Decimal,
    pub adjusted_gross_income: Decimal,
    pub deduction_applied: Decimal,
    pub used_itemized: bool,
    pub taxable_income: Decimal,
    pub regular_tax: Decimal,
    pub amt_liability: Decimal,
    pub total_tax: Decimal,
    pub balance_due: Decimal,
    pub refund: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// For creating new saved computations (no id or timestamps).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSavedComputation {
    pub tax_year: i32,
    pub filing_status_id: i32,
    pub gross_income: Decimal,
    pub adjusted_gross_income: Decimal,
    pub deduction_applied: Decimal,
    pub used_itemized: bool,
    pub taxable_income: Decimal,
    pub regular_tax: Decimal,
    pub amt_liability: Decimal,
    pub total_tax: Decimal,
    pub balance_due: Decimal,
    pub refund: Decimal,
}
