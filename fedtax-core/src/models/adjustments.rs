use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, require_non_negative};

/// Above-the-line adjustment inputs, as entered.
///
/// The engine caps and phases each field against MAGI and the filing status;
/// this model only carries the raw amounts. Roth contributions never reduce
/// AGI; the engine reports the allowed contribution for the year instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdjustmentSet {
    /// Student loan interest paid, before the statutory cap and phaseout.
    pub student_loan_interest: Decimal,

    /// Traditional IRA contribution, before the contribution limit and the
    /// employer-plan phaseout.
    pub traditional_ira_contribution: Decimal,

    /// Roth IRA contribution. Not a deduction; the allowed amount is phased
    /// against MAGI and reported in the breakdown.
    pub roth_ira_contribution: Decimal,

    /// HSA contribution, capped at the annual limit.
    pub hsa_contribution: Decimal,

    /// Educator expenses, capped at the annual limit.
    pub educator_expenses: Decimal,

    /// Deductible half of self-employment tax, computed upstream.
    pub se_tax_deduction: Decimal,
}

impl AdjustmentSet {
    pub fn empty() -> Self {
        Self {
            student_loan_interest: Decimal::ZERO,
            traditional_ira_contribution: Decimal::ZERO,
            roth_ira_contribution: Decimal::ZERO,
            hsa_contribution: Decimal::ZERO,
            educator_expenses: Decimal::ZERO,
            se_tax_deduction: Decimal::ZERO,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("student_loan_interest", self.student_loan_interest)?;
        require_non_negative(
            "traditional_ira_contribution",
            self.traditional_ira_contribution,
        )?;
        require_non_negative("roth_ira_contribution", self.roth_ira_contribution)?;
        require_non_negative("hsa_contribution", self.hsa_contribution)?;
        require_non_negative("educator_expenses", self.educator_expenses)?;
        require_non_negative("se_tax_deduction", self.se_tax_deduction)?;
        Ok(())
    }
}
