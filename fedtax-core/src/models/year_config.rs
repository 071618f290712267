use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Per-year scalar parameters shared across filing statuses.
///
/// Per-status amounts (standard deductions, bracket tables, AMT exemptions,
/// phaseout ranges, capital-gains tiers) live in their own tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearConfig {
    pub tax_year: i32,

    /// Aggregate cap on the SALT deduction.
    pub salt_cap: Decimal,

    /// AGI floor rate for medical expenses (0.075 under current law).
    pub medical_agi_floor: Decimal,

    /// Acquisition-debt ceiling for mortgage interest, current law.
    pub mortgage_ceiling: Decimal,

    /// Acquisition-debt ceiling for grandfathered debt.
    pub mortgage_ceiling_grandfathered: Decimal,

    /// AMT rate below the breakpoint (0.26).
    pub amt_low_rate: Decimal,

    /// AMT rate at and above the breakpoint (0.28).
    pub amt_high_rate: Decimal,

    /// Annual traditional/Roth IRA contribution limit.
    pub ira_contribution_limit: Decimal,

    /// Statutory cap on the student loan interest deduction.
    pub student_loan_interest_cap: Decimal,

    /// Annual HSA contribution cap (self-only coverage).
    pub hsa_contribution_cap: Decimal,

    /// Annual educator expense cap.
    pub educator_expense_cap: Decimal,

    /// Minimum standard deduction for a filer claimed as a dependent.
    pub dependent_deduction_base: Decimal,

    /// Earned-income add-on in the dependent-filer formula.
    pub dependent_earned_income_addon: Decimal,

    /// Middle preferential rate for qualified dividends and long-term gains
    /// (0.15). The bottom tier is taxed at zero by definition.
    pub preferential_mid_rate: Decimal,

    /// Top preferential rate (0.20).
    pub preferential_top_rate: Decimal,

    /// Charitable cash contribution cap as a share of AGI (0.60).
    pub charitable_cash_agi_rate: Decimal,

    /// Charitable non-cash contribution cap as a share of AGI (0.30).
    pub charitable_noncash_agi_rate: Decimal,
}

#[cfg(test)]
pub(crate) fn test_year_config_2025() -> YearConfig {
    use rust_decimal_macros::dec;

    YearConfig {
        tax_year: 2025,
        salt_cap: dec!(10000),
        medical_agi_floor: dec!(0.075),
        mortgage_ceiling: dec!(750000),
        mortgage_ceiling_grandfathered: dec!(1000000),
        amt_low_rate: dec!(0.26),
        amt_high_rate: dec!(0.28),
        ira_contribution_limit: dec!(7000),
        student_loan_interest_cap: dec!(2500),
        hsa_contribution_cap: dec!(4300),
        educator_expense_cap: dec!(300),
        dependent_deduction_base: dec!(1350),
        dependent_earned_income_addon: dec!(450),
        preferential_mid_rate: dec!(0.15),
        preferential_top_rate: dec!(0.20),
        charitable_cash_agi_rate: dec!(0.60),
        charitable_noncash_agi_rate: dec!(0.30),
    }
}
