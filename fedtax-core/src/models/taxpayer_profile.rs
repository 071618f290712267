use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::filing_status::FilingStatusCode;
use super::validation::{ValidationError, require_non_negative};

/// Taxpayer attributes fixed for the duration of a computation.
///
/// The profile is an immutable input: once a calculation starts, none of
/// these fields change. Spouse flags are only counted for joint returns;
/// `spouse_itemizes` only matters for married-filing-separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxpayerProfile {
    pub filing_status: FilingStatusCode,

    /// Taxpayer was 65 or older at year end.
    pub over_65: bool,

    /// Taxpayer is legally blind.
    pub blind: bool,

    /// Spouse was 65 or older at year end (joint returns).
    pub spouse_over_65: bool,

    /// Spouse is legally blind (joint returns).
    pub spouse_blind: bool,

    /// Taxpayer can be claimed as a dependent on another return, which
    /// limits the standard deduction to the dependent-filer formula.
    pub claimed_as_dependent: bool,

    /// Earned income for the dependent-filer standard deduction formula.
    /// Ignored unless `claimed_as_dependent` is set.
    pub earned_income: Decimal,

    /// MFS only: the spouse itemizes on their own return, forcing this
    /// return's standard deduction to zero.
    pub spouse_itemizes: bool,

    /// Dual-status aliens are not entitled to the standard deduction.
    pub dual_status_alien: bool,

    /// Taxpayer is an active participant in an employer retirement plan,
    /// which subjects the traditional IRA deduction to its phaseout.
    pub covered_by_employer_plan: bool,
}

impl TaxpayerProfile {
    /// Default profile for a filing status: no age/blindness conditions and
    /// no special overrides.
    pub fn new(filing_status: FilingStatusCode) -> Self {
        Self {
            filing_status,
            over_65: false,
            blind: false,
            spouse_over_65: false,
            spouse_blind: false,
            claimed_as_dependent: false,
            earned_income: Decimal::ZERO,
            spouse_itemizes: false,
            dual_status_alien: false,
            covered_by_employer_plan: false,
        }
    }

    /// Number of age-65/blindness conditions that earn an additional
    /// standard deduction amount. Spouse conditions count only on joint
    /// returns.
    pub fn additional_deduction_conditions(&self) -> u32 {
        let mut count = 0;
        if self.over_65 {
            count += 1;
        }
        if self.blind {
            count += 1;
        }
        if self.filing_status.is_joint() {
            if self.spouse_over_65 {
                count += 1;
            }
            if self.spouse_blind {
                count += 1;
            }
        }
        count
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_non_negative("earned_income", self.earned_income)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn new_profile_has_no_conditions() {
        let profile = TaxpayerProfile::new(FilingStatusCode::Single);

        assert_eq!(profile.additional_deduction_conditions(), 0);
    }

    #[test]
    fn counts_taxpayer_conditions() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.over_65 = true;
        profile.blind = true;

        assert_eq!(profile.additional_deduction_conditions(), 2);
    }

    #[test]
    fn counts_spouse_conditions_on_joint_return() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::MarriedFilingJointly);
        profile.over_65 = true;
        profile.spouse_over_65 = true;
        profile.spouse_blind = true;

        assert_eq!(profile.additional_deduction_conditions(), 3);
    }

    #[test]
    fn ignores_spouse_conditions_for_single_filer() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.spouse_over_65 = true;
        profile.spouse_blind = true;

        assert_eq!(profile.additional_deduction_conditions(), 0);
    }

    #[test]
    fn ignores_spouse_conditions_for_mfs_filer() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::MarriedFilingSeparately);
        profile.spouse_over_65 = true;

        assert_eq!(profile.additional_deduction_conditions(), 0);
    }

    #[test]
    fn validate_rejects_negative_earned_income() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.earned_income = dec!(-500);

        assert_eq!(
            profile.validate(),
            Err(ValidationError::NegativeAmount {
                field: "earned_income",
                value: dec!(-500),
            })
        );
    }
}
