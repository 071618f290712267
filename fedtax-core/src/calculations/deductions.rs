//! Standard deduction, itemized deduction totals, and the choice between
//! them.
//!
//! The standard deduction starts from the filing-status base, adds the
//! age-65/blindness amounts, and applies three overrides evaluated first:
//! an MFS filer whose spouse itemizes gets zero, a dual-status alien gets
//! zero, and a filer claimed as a dependent has the base limited by the
//! dependent-filer formula.
//!
//! Itemizing totals the per-category capped amounts: medical above the AGI
//! floor, SALT under the aggregate cap, mortgage interest per the debt
//! ceiling, charitable under the AGI percentage limits, casualty losses, and
//! gambling losses up to winnings.
//!
//! The selector takes the larger of the two. Equal amounts resolve to the
//! standard deduction unless the tie policy is flipped, since itemizing an
//! equal amount only costs the taxpayer documentation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::max;
use crate::calculations::mortgage::{MortgageError, MortgageInterestLimiter};
use crate::models::{ItemizedDeductionSet, StandardDeduction, TaxpayerProfile, YearConfig};

/// Calculator for the standard deduction of one filing status and year.
#[derive(Debug, Clone)]
pub struct StandardDeductionCalculator {
    base_amount: Decimal,
    additional_amount: Decimal,
    dependent_base: Decimal,
    dependent_earned_income_addon: Decimal,
}

impl StandardDeductionCalculator {
    pub fn from_parts(deduction: &StandardDeduction, config: &YearConfig) -> Self {
        Self {
            base_amount: deduction.base_amount,
            additional_amount: deduction.additional_amount,
            dependent_base: config.dependent_deduction_base,
            dependent_earned_income_addon: config.dependent_earned_income_addon,
        }
    }

    /// Standard deduction for the profile, overrides first.
    pub fn calculate(&self, profile: &TaxpayerProfile) -> Decimal {
        if profile.filing_status.is_separate() && profile.spouse_itemizes {
            debug!("spouse itemizes on a separate return; standard deduction is zero");
            return Decimal::ZERO;
        }
        if profile.dual_status_alien {
            debug!("dual-status alien; standard deduction is zero");
            return Decimal::ZERO;
        }

        let base = if profile.claimed_as_dependent {
            self.dependent_base_amount(profile.earned_income)
        } else {
            self.base_amount
        };

        let additions = Decimal::from(profile.additional_deduction_conditions())
            * self.additional_amount;

        base + additions
    }

    /// Dependent-filer formula: the greater of the dependent base or earned
    /// income plus the add-on, never more than the regular base.
    fn dependent_base_amount(&self, earned_income: Decimal) -> Decimal {
        max(
            self.dependent_base,
            earned_income + self.dependent_earned_income_addon,
        )
        .min(self.base_amount)
    }
}

/// Per-category deductible amounts plus the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemizedResult {
    pub medical: Decimal,
    pub salt: Decimal,
    pub mortgage_interest: Decimal,
    pub charitable: Decimal,
    pub casualty: Decimal,
    pub gambling_losses: Decimal,
    pub total: Decimal,
}

/// Totals the capped per-category deductions for one return.
#[derive(Debug, Clone)]
pub struct ItemizedWorksheet<'a> {
    config: &'a YearConfig,
    mortgage_limiter: MortgageInterestLimiter,
}

impl<'a> ItemizedWorksheet<'a> {
    pub fn new(config: &'a YearConfig, mortgage_limiter: MortgageInterestLimiter) -> Self {
        Self {
            config,
            mortgage_limiter,
        }
    }

    /// Total itemized deductions for the set, against `agi` and gambling
    /// `winnings`. Every category clamps at zero, so the total is
    /// non-negative for any non-negative inputs.
    ///
    /// # Errors
    ///
    /// Returns [`MortgageError`] if the configured debt ceiling is invalid.
    pub fn calculate(
        &self,
        set: &ItemizedDeductionSet,
        agi: Decimal,
        winnings: Decimal,
    ) -> Result<ItemizedResult, MortgageError> {
        let medical = set.deductible_medical(agi, self.config.medical_agi_floor);
        let salt = set.deductible_salt(self.config.salt_cap);
        let mortgage = self.mortgage_limiter.calculate(
            set.mortgage_interest,
            set.mortgage_points,
            set.mortgage_principal,
            set.grandfathered_debt,
        )?;
        let charitable = set.deductible_charitable(
            agi,
            self.config.charitable_cash_agi_rate,
            self.config.charitable_noncash_agi_rate,
        );
        let gambling_losses = set.deductible_gambling_losses(winnings);

        let total = medical
            + salt
            + mortgage.deductible_total
            + charitable
            + set.casualty_losses
            + gambling_losses;

        Ok(ItemizedResult {
            medical,
            salt,
            mortgage_interest: mortgage.deductible_total,
            charitable,
            casualty: set.casualty_losses,
            gambling_losses,
            total,
        })
    }
}

/// Outcome of the standard-vs-itemized choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionChoice {
    pub amount: Decimal,
    pub used_itemized: bool,
}

/// Chooses the larger deduction. Ties go to the standard deduction unless
/// `prefer_itemized_on_tie` is set.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeductionSelector {
    pub prefer_itemized_on_tie: bool,
}

impl DeductionSelector {
    pub fn choose(&self, standard: Decimal, itemized: Decimal) -> DeductionChoice {
        let used_itemized = if self.prefer_itemized_on_tie {
            itemized >= standard
        } else {
            itemized > standard
        };

        DeductionChoice {
            amount: max(standard, itemized),
            used_itemized,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::calculations::mortgage::MortgageCeilings;
    use crate::models::FilingStatusCode;
    use crate::models::test_year_config_2025;

    use super::*;

    fn single_std() -> StandardDeductionCalculator {
        let deduction = StandardDeduction {
            tax_year: 2025,
            filing_status_id: 1,
            base_amount: dec!(15000),
            additional_amount: dec!(2000),
        };
        StandardDeductionCalculator::from_parts(&deduction, &test_year_config_2025())
    }

    fn mfs_std() -> StandardDeductionCalculator {
        let deduction = StandardDeduction {
            tax_year: 2025,
            filing_status_id: 3,
            base_amount: dec!(15000),
            additional_amount: dec!(1600),
        };
        StandardDeductionCalculator::from_parts(&deduction, &test_year_config_2025())
    }

    fn worksheet_for(status: FilingStatusCode, config: &YearConfig) -> ItemizedWorksheet<'_> {
        let limiter = MortgageInterestLimiter::new(
            MortgageCeilings {
                current_law: config.mortgage_ceiling,
                grandfathered: config.mortgage_ceiling_grandfathered,
            },
            status,
        );
        ItemizedWorksheet::new(config, limiter)
    }

    // =========================================================================
    // StandardDeductionCalculator tests
    // =========================================================================

    #[test]
    fn base_amount_for_plain_filer() {
        let profile = TaxpayerProfile::new(FilingStatusCode::Single);

        assert_eq!(single_std().calculate(&profile), dec!(15000));
    }

    #[test]
    fn adds_amount_per_condition() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.over_65 = true;
        profile.blind = true;

        assert_eq!(single_std().calculate(&profile), dec!(19000));
    }

    #[test]
    fn mfs_spouse_itemizes_forces_zero() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::MarriedFilingSeparately);
        profile.spouse_itemizes = true;
        profile.over_65 = true;
        profile.blind = true;

        // Zero regardless of age/blindness additions.
        assert_eq!(mfs_std().calculate(&profile), dec!(0));
    }

    #[test]
    fn spouse_itemizing_is_ignored_outside_mfs() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.spouse_itemizes = true;

        assert_eq!(single_std().calculate(&profile), dec!(15000));
    }

    #[test]
    fn dual_status_alien_forces_zero() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.dual_status_alien = true;

        assert_eq!(single_std().calculate(&profile), dec!(0));
    }

    #[test]
    fn dependent_with_no_earned_income_gets_dependent_base() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.claimed_as_dependent = true;

        assert_eq!(single_std().calculate(&profile), dec!(1350));
    }

    #[test]
    fn dependent_formula_tracks_earned_income() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.claimed_as_dependent = true;
        profile.earned_income = dec!(6000);

        // max(1350, 6000 + 450) = 6450
        assert_eq!(single_std().calculate(&profile), dec!(6450));
    }

    #[test]
    fn dependent_formula_caps_at_regular_base() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.claimed_as_dependent = true;
        profile.earned_income = dec!(20000);

        assert_eq!(single_std().calculate(&profile), dec!(15000));
    }

    #[test]
    fn dependent_still_gets_age_additions() {
        let mut profile = TaxpayerProfile::new(FilingStatusCode::Single);
        profile.claimed_as_dependent = true;
        profile.over_65 = true;

        assert_eq!(single_std().calculate(&profile), dec!(3350));
    }

    // =========================================================================
    // ItemizedWorksheet tests
    // =========================================================================

    #[test]
    fn totals_capped_categories() {
        let config = test_year_config_2025();
        let worksheet = worksheet_for(FilingStatusCode::Single, &config);

        let mut set = ItemizedDeductionSet::empty();
        set.medical_expenses = dec!(10000); // 2500 above the 7.5% floor
        set.state_local_income_taxes = dec!(8000);
        set.property_taxes = dec!(5000); // SALT capped at 10000
        set.mortgage_interest = dec!(12000); // principal 0, unlimited
        set.charitable_cash = dec!(4000);
        set.gambling_losses = dec!(2000); // capped at 500 winnings

        let result = worksheet.calculate(&set, dec!(100000), dec!(500)).unwrap();

        assert_eq!(result.medical, dec!(2500));
        assert_eq!(result.salt, dec!(10000));
        assert_eq!(result.mortgage_interest, dec!(12000));
        assert_eq!(result.charitable, dec!(4000));
        assert_eq!(result.gambling_losses, dec!(500));
        assert_eq!(result.total, dec!(29000));
    }

    #[test]
    fn empty_set_totals_zero() {
        let config = test_year_config_2025();
        let worksheet = worksheet_for(FilingStatusCode::Single, &config);

        let result = worksheet
            .calculate(&ItemizedDeductionSet::empty(), dec!(80000), dec!(0))
            .unwrap();

        assert_eq!(result.total, dec!(0));
    }

    #[test]
    fn home_equity_interest_never_enters_total() {
        let config = test_year_config_2025();
        let worksheet = worksheet_for(FilingStatusCode::Single, &config);

        let mut set = ItemizedDeductionSet::empty();
        set.mortgage_interest = dec!(10000);
        set.home_equity_interest = dec!(5000);

        let result = worksheet.calculate(&set, dec!(100000), dec!(0)).unwrap();

        assert_eq!(result.mortgage_interest, dec!(10000));
        assert_eq!(result.total, dec!(10000));
    }

    #[test]
    fn mortgage_limitation_flows_into_total() {
        let config = test_year_config_2025();
        let worksheet = worksheet_for(FilingStatusCode::Single, &config);

        let mut set = ItemizedDeductionSet::empty();
        set.mortgage_interest = dec!(50000);
        set.mortgage_principal = dec!(1000000);

        let result = worksheet.calculate(&set, dec!(400000), dec!(0)).unwrap();

        assert_eq!(result.mortgage_interest, dec!(37500));
    }

    // =========================================================================
    // DeductionSelector tests
    // =========================================================================

    #[test]
    fn selector_takes_larger_itemized() {
        let choice = DeductionSelector::default().choose(dec!(15000), dec!(22000));

        assert_eq!(choice.amount, dec!(22000));
        assert!(choice.used_itemized);
    }

    #[test]
    fn selector_takes_larger_standard() {
        let choice = DeductionSelector::default().choose(dec!(15000), dec!(9000));

        assert_eq!(choice.amount, dec!(15000));
        assert!(!choice.used_itemized);
    }

    #[test]
    fn tie_goes_to_standard_by_default() {
        let choice = DeductionSelector::default().choose(dec!(15000), dec!(15000));

        assert_eq!(choice.amount, dec!(15000));
        assert!(!choice.used_itemized);
    }

    #[test]
    fn tie_policy_is_configurable() {
        let selector = DeductionSelector {
            prefer_itemized_on_tie: true,
        };

        let choice = selector.choose(dec!(15000), dec!(15000));

        assert_eq!(choice.amount, dec!(15000));
        assert!(choice.used_itemized);
    }
}
