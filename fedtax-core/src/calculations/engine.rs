//! Federal tax computation engine.
//!
//! `calculate` consumes a fully-populated return input graph and produces a
//! [`ComputationBreakdown`] with every derived line item. The pipeline is a
//! pure, synchronous function over value objects:
//!
//! 1. Validate the input graph (negative amounts are rejected by field).
//! 2. Gross income, then the non-phased adjustments (SE-tax half, capped
//!    HSA, capped educator expenses) and MAGI.
//! 3. Phased adjustments: student loan interest, traditional IRA deduction,
//!    and the informational Roth contribution allowance.
//! 4. AGI, the standard-vs-itemized choice, taxable income.
//! 5. Regular tax with preferential income stacked on top of ordinary
//!    income through the 0/15/20 tiers.
//! 6. AMT over the same taxable income, with the SALT add-back when
//!    itemizing.
//! 7. Credits, payments, and the final balance due or refund.
//!
//! [`EngineParameters::load`] assembles the full parameter set for one
//! `(year, filing status)` from a [`FilingRepository`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::amt::{AmtConfig, AmtError, AmtResult, AmtWorksheet, PreferenceItems};
use crate::calculations::common::{max, round_half_up};
use crate::calculations::deductions::{
    DeductionSelector, ItemizedWorksheet, StandardDeductionCalculator,
};
use crate::calculations::mortgage::{MortgageCeilings, MortgageError, MortgageInterestLimiter};
use crate::calculations::phaseout::{PhaseoutRounding, phase_out};
use crate::db::repository::{FilingRepository, RepositoryError};
use crate::models::{
    AdjustmentSet, BracketTable, BracketTableError, CapitalGainsThresholds, FilingStatusCode,
    IncomeSnapshot, ItemizedDeductionSet, NewSavedComputation, PhaseoutKind, PhaseoutRange,
    StandardDeduction, TaxpayerProfile, ValidationError, YearConfig,
};

/// Errors that can occur while assembling parameters or running the engine.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("invalid bracket table: {0}")]
    Brackets(#[from] BracketTableError),

    #[error(transparent)]
    Amt(#[from] AmtError),

    #[error(transparent)]
    Mortgage(#[from] MortgageError),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("parameters were loaded for {expected:?} but the return is {actual:?}")]
    FilingStatusMismatch {
        expected: FilingStatusCode,
        actual: FilingStatusCode,
    },
}

/// The complete input graph for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnInput {
    pub profile: TaxpayerProfile,
    pub income: IncomeSnapshot,
    pub adjustments: AdjustmentSet,
    /// `None` means the return has no itemizable deductions at all.
    pub itemized: Option<ItemizedDeductionSet>,
    pub preferences: PreferenceItems,

    /// Non-refundable credits, applied against tax down to zero.
    pub nonrefundable_credits: Decimal,
    /// Refundable credits, treated as payments.
    pub refundable_credits: Decimal,
    pub withholding: Decimal,
    pub estimated_payments: Decimal,
    pub prior_year_amt_credit: Decimal,
}

impl ReturnInput {
    /// A minimal return for the profile: no income, no deductions.
    pub fn new(profile: TaxpayerProfile) -> Self {
        Self {
            profile,
            income: IncomeSnapshot::empty(),
            adjustments: AdjustmentSet::empty(),
            itemized: None,
            preferences: PreferenceItems::empty(),
            nonrefundable_credits: Decimal::ZERO,
            refundable_credits: Decimal::ZERO,
            withholding: Decimal::ZERO,
            estimated_payments: Decimal::ZERO,
            prior_year_amt_credit: Decimal::ZERO,
        }
    }
}

/// Every derived line item of one calculation.
///
/// Write-once: built in full by `calculate` and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationBreakdown {
    pub gross_income: Decimal,
    pub total_adjustments: Decimal,
    pub adjusted_gross_income: Decimal,

    pub standard_deduction: Decimal,
    pub itemized_deduction: Decimal,
    pub deduction_applied: Decimal,
    pub used_itemized: bool,

    pub taxable_income: Decimal,
    pub ordinary_tax: Decimal,
    pub preferential_tax: Decimal,
    pub regular_tax: Decimal,

    pub amt: AmtResult,

    pub nonrefundable_credits_applied: Decimal,
    pub total_tax: Decimal,
    pub total_payments: Decimal,
    pub balance_due: Decimal,
    pub refund: Decimal,

    /// Allowed Roth IRA contribution for the year, informational.
    pub roth_contribution_allowed: Decimal,
}

impl ComputationBreakdown {
    /// Projects the breakdown onto the persisted record shape.
    pub fn to_saved(&self, tax_year: i32, filing_status_id: i32) -> NewSavedComputation {
        NewSavedComputation {
            tax_year,
            filing_status_id,
            gross_income: self.gross_income,
            adjusted_gross_income: self.adjusted_gross_income,
            deduction_applied: self.deduction_applied,
            used_itemized: self.used_itemized,
            taxable_income: self.taxable_income,
            regular_tax: self.regular_tax,
            amt_liability: self.amt.amt_liability,
            total_tax: self.total_tax,
            balance_due: self.balance_due,
            refund: self.refund,
        }
    }
}

/// The full parameter set for one filing status and year.
#[derive(Debug, Clone)]
pub struct EngineParameters {
    pub filing_status: FilingStatusCode,
    pub filing_status_id: i32,
    pub year_config: YearConfig,
    pub standard_deduction: StandardDeduction,
    pub brackets: BracketTable,
    pub amt: AmtConfig,
    pub capital_gains: CapitalGainsThresholds,
    /// `None` means the deduction is unavailable for this status.
    pub ira_deduction_phaseout: Option<PhaseoutRange>,
    pub roth_contribution_phaseout: Option<PhaseoutRange>,
    pub student_loan_phaseout: Option<PhaseoutRange>,
}

impl EngineParameters {
    /// Loads everything the engine needs for `(year, filing_status)` from
    /// the repository.
    pub async fn load(
        repo: &dyn FilingRepository,
        tax_year: i32,
        filing_status: FilingStatusCode,
    ) -> Result<Self, EngineError> {
        let status = repo
            .get_filing_status_by_code(filing_status.as_str())
            .await?;
        let year_config = repo.get_year_config(tax_year).await?;
        let standard_deduction = repo.get_standard_deduction(tax_year, status.id).await?;
        let brackets = BracketTable::new(repo.get_tax_brackets(tax_year, status.id).await?)?;
        let amt_parameters = repo.get_amt_parameters(tax_year, status.id).await?;
        let amt = AmtConfig::from_parts(&amt_parameters, &year_config)?;
        let capital_gains = repo
            .get_capital_gains_thresholds(tax_year, status.id)
            .await?;

        let mut phaseouts = [None, None, None];
        for (slot, kind) in phaseouts.iter_mut().zip([
            PhaseoutKind::IraDeduction,
            PhaseoutKind::RothContribution,
            PhaseoutKind::StudentLoanInterest,
        ]) {
            *slot = match repo.get_phaseout_range(tax_year, status.id, kind).await {
                Ok(range) => Some(range),
                Err(RepositoryError::NotFound) => None,
                Err(other) => return Err(other.into()),
            };
        }
        let [ira_deduction_phaseout, roth_contribution_phaseout, student_loan_phaseout] =
            phaseouts;

        Ok(Self {
            filing_status,
            filing_status_id: status.id,
            year_config,
            standard_deduction,
            brackets,
            amt,
            capital_gains,
            ira_deduction_phaseout,
            roth_contribution_phaseout,
            student_loan_phaseout,
        })
    }
}

/// The computation engine for one filing status and year.
#[derive(Debug, Clone)]
pub struct TaxComputationEngine {
    params: EngineParameters,
    selector: DeductionSelector,
}

impl TaxComputationEngine {
    pub fn new(params: EngineParameters) -> Self {
        Self {
            params,
            selector: DeductionSelector::default(),
        }
    }

    /// Overrides the standard-vs-itemized tie policy.
    pub fn with_selector(mut self, selector: DeductionSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn params(&self) -> &EngineParameters {
        &self.params
    }

    /// Runs the full computation for one return.
    ///
    /// # Errors
    ///
    /// Validation errors for negative inputs, a filing-status mismatch
    /// between the parameters and the return, or a calculator error.
    pub fn calculate(&self, input: &ReturnInput) -> Result<ComputationBreakdown, EngineError> {
        self.validate(input)?;

        let gross_income = input.income.gross_income();

        // Non-phased adjustments and the MAGI the phased rules key on.
        let base_adjustments = self.base_adjustments(&input.adjustments);
        let magi = gross_income - base_adjustments;

        let student_loan_deduction = self.student_loan_deduction(&input.adjustments, magi);
        let ira_deduction = self.ira_deduction(input, magi);
        let roth_contribution_allowed = self.roth_contribution_allowed(&input.adjustments, magi);

        let total_adjustments =
            round_half_up(base_adjustments + student_loan_deduction + ira_deduction);
        let adjusted_gross_income = round_half_up(gross_income - total_adjustments);

        // Deduction choice.
        let standard_deduction =
            StandardDeductionCalculator::from_parts(
                &self.params.standard_deduction,
                &self.params.year_config,
            )
            .calculate(&input.profile);

        let itemized_result = match &input.itemized {
            Some(set) => Some(self.itemized_worksheet().calculate(
                set,
                adjusted_gross_income,
                input.income.gambling_winnings,
            )?),
            None => None,
        };
        let itemized_deduction = itemized_result
            .as_ref()
            .map(|r| r.total)
            .unwrap_or(Decimal::ZERO);

        let choice = self.selector.choose(standard_deduction, itemized_deduction);
        let taxable_income = max(adjusted_gross_income - choice.amount, Decimal::ZERO);

        // Regular tax: preferential income stacks on top of ordinary income.
        let preferential = input
            .income
            .preferential_income()
            .min(taxable_income)
            .max(Decimal::ZERO);
        let ordinary_taxable = taxable_income - preferential;
        let ordinary_tax = self.params.brackets.tax_for(ordinary_taxable);
        let preferential_tax = self.preferential_tax(ordinary_taxable, preferential);
        let regular_tax = round_half_up(ordinary_tax + preferential_tax);

        // AMT. The SALT add-back only applies when the return itemizes.
        let salt_addback = if choice.used_itemized {
            itemized_result
                .as_ref()
                .map(|r| r.salt)
                .unwrap_or(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };
        let amt = AmtWorksheet::new(self.params.amt.clone()).calculate(
            taxable_income,
            &input.preferences,
            salt_addback,
            regular_tax,
            input.prior_year_amt_credit,
        )?;

        // Credits, payments, settlement.
        let tax_before_credits = regular_tax + amt.amt_liability;
        let nonrefundable_credits_applied =
            input.nonrefundable_credits.min(tax_before_credits);
        let total_tax = round_half_up(tax_before_credits - nonrefundable_credits_applied);

        let total_payments = round_half_up(
            input.withholding + input.estimated_payments + input.refundable_credits,
        );
        let balance = total_tax - total_payments;
        let (balance_due, refund) = if balance >= Decimal::ZERO {
            (balance, Decimal::ZERO)
        } else {
            (Decimal::ZERO, -balance)
        };

        Ok(ComputationBreakdown {
            gross_income,
            total_adjustments,
            adjusted_gross_income,
            standard_deduction,
            itemized_deduction,
            deduction_applied: choice.amount,
            used_itemized: choice.used_itemized,
            taxable_income,
            ordinary_tax,
            preferential_tax,
            regular_tax,
            amt,
            nonrefundable_credits_applied,
            total_tax,
            total_payments,
            balance_due,
            refund,
            roth_contribution_allowed,
        })
    }

    fn validate(&self, input: &ReturnInput) -> Result<(), EngineError> {
        input.profile.validate()?;
        input.income.validate()?;
        input.adjustments.validate()?;
        if let Some(itemized) = &input.itemized {
            itemized.validate()?;
        }
        input.preferences.validate()?;
        crate::models::require_non_negative("nonrefundable_credits", input.nonrefundable_credits)?;
        crate::models::require_non_negative("refundable_credits", input.refundable_credits)?;
        crate::models::require_non_negative("withholding", input.withholding)?;
        crate::models::require_non_negative("estimated_payments", input.estimated_payments)?;
        crate::models::require_non_negative("prior_year_amt_credit", input.prior_year_amt_credit)?;

        if input.profile.filing_status != self.params.filing_status {
            return Err(EngineError::FilingStatusMismatch {
                expected: self.params.filing_status,
                actual: input.profile.filing_status,
            });
        }
        Ok(())
    }

    /// Adjustments with a flat cap and no income phaseout.
    fn base_adjustments(&self, adjustments: &AdjustmentSet) -> Decimal {
        adjustments.se_tax_deduction
            + adjustments
                .hsa_contribution
                .min(self.params.year_config.hsa_contribution_cap)
            + adjustments
                .educator_expenses
                .min(self.params.year_config.educator_expense_cap)
    }

    /// Student loan interest: statutory cap, then the MAGI phaseout. Zero
    /// for statuses without a phaseout range (the deduction is unavailable).
    fn student_loan_deduction(&self, adjustments: &AdjustmentSet, magi: Decimal) -> Decimal {
        if adjustments.student_loan_interest == Decimal::ZERO {
            return Decimal::ZERO;
        }
        let capped = adjustments
            .student_loan_interest
            .min(self.params.year_config.student_loan_interest_cap);

        match &self.params.student_loan_phaseout {
            Some(range) => phase_out(capped, magi, range, PhaseoutRounding::Cents),
            None => {
                debug!(
                    filing_status = ?self.params.filing_status,
                    "student loan interest deduction unavailable for this filing status"
                );
                Decimal::ZERO
            }
        }
    }

    /// Traditional IRA deduction: the contribution up to the annual limit,
    /// phased only for filers covered by an employer plan, with the
    /// nearest-$10 / $200-floor convention.
    fn ira_deduction(&self, input: &ReturnInput, magi: Decimal) -> Decimal {
        let contribution = input
            .adjustments
            .traditional_ira_contribution
            .min(self.params.year_config.ira_contribution_limit);
        if contribution == Decimal::ZERO {
            return Decimal::ZERO;
        }
        if !input.profile.covered_by_employer_plan {
            return contribution;
        }

        match &self.params.ira_deduction_phaseout {
            Some(range) => {
                let phased_limit = phase_out(
                    self.params.year_config.ira_contribution_limit,
                    magi,
                    range,
                    PhaseoutRounding::NearestTenWithFloor(Decimal::from(200)),
                );
                contribution.min(phased_limit)
            }
            None => {
                debug!(
                    filing_status = ?self.params.filing_status,
                    "no IRA deduction phaseout configured; treating the deduction as unavailable"
                );
                Decimal::ZERO
            }
        }
    }

    /// Allowed Roth contribution for the year: the annual limit phased
    /// against MAGI, bounded by what was actually contributed.
    fn roth_contribution_allowed(&self, adjustments: &AdjustmentSet, magi: Decimal) -> Decimal {
        let contribution = adjustments
            .roth_ira_contribution
            .min(self.params.year_config.ira_contribution_limit);
        if contribution == Decimal::ZERO {
            return Decimal::ZERO;
        }

        match &self.params.roth_contribution_phaseout {
            Some(range) => {
                let phased_limit = phase_out(
                    self.params.year_config.ira_contribution_limit,
                    magi,
                    range,
                    PhaseoutRounding::NearestTenWithFloor(Decimal::from(200)),
                );
                contribution.min(phased_limit)
            }
            None => contribution,
        }
    }

    fn itemized_worksheet(&self) -> ItemizedWorksheet<'_> {
        let limiter = MortgageInterestLimiter::new(
            MortgageCeilings {
                current_law: self.params.year_config.mortgage_ceiling,
                grandfathered: self.params.year_config.mortgage_ceiling_grandfathered,
            },
            self.params.filing_status,
        );
        ItemizedWorksheet::new(&self.params.year_config, limiter)
    }

    /// Tax on preferential income stacked on top of ordinary income: the
    /// slice below the zero-rate top is untaxed, the slice up to the
    /// fifteen-rate top takes the middle rate, the rest the top rate.
    fn preferential_tax(&self, ordinary_taxable: Decimal, preferential: Decimal) -> Decimal {
        if preferential <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let zero_top = self.params.capital_gains.zero_rate_max;
        let fifteen_top = self.params.capital_gains.fifteen_rate_max;

        let in_zero = max(zero_top - ordinary_taxable, Decimal::ZERO).min(preferential);
        let after_zero = preferential - in_zero;
        let fifteen_floor = max(ordinary_taxable, zero_top);
        let in_fifteen = max(fifteen_top - fifteen_floor, Decimal::ZERO).min(after_zero);
        let in_twenty = after_zero - in_fifteen;

        round_half_up(
            in_fifteen * self.params.year_config.preferential_mid_rate
                + in_twenty * self.params.year_config.preferential_top_rate,
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use crate::models::test_year_config_2025;
    use crate::models::{AmtParameters, TaxBracket};

    use super::*;

    fn single_brackets_2025() -> Vec<TaxBracket> {
        let rows = [
            (dec!(0), Some(dec!(11925)), dec!(0.10), dec!(0)),
            (dec!(11925), Some(dec!(48475)), dec!(0.12), dec!(1192.50)),
            (dec!(48475), Some(dec!(103350)), dec!(0.22), dec!(5578.50)),
            (dec!(103350), Some(dec!(197300)), dec!(0.24), dec!(17651)),
            (dec!(197300), Some(dec!(250525)), dec!(0.32), dec!(40199)),
            (dec!(250525), Some(dec!(626350)), dec!(0.35), dec!(57231)),
            (dec!(626350), None, dec!(0.37), dec!(188769.75)),
        ];
        rows.into_iter()
            .map(|(min, max, rate, base)| TaxBracket {
                tax_year: 2025,
                filing_status_id: 1,
                min_income: min,
                max_income: max,
                tax_rate: rate,
                base_tax: base,
            })
            .collect()
    }

    fn single_params() -> EngineParameters {
        let year_config = test_year_config_2025();
        let amt_parameters = AmtParameters {
            tax_year: 2025,
            filing_status_id: 1,
            exemption: dec!(88100),
            phaseout_start: dec!(626350),
            phaseout_end: dec!(978750),
            rate_breakpoint: dec!(239100),
        };
        let amt = AmtConfig::from_parts(&amt_parameters, &year_config).unwrap();

        EngineParameters {
            filing_status: FilingStatusCode::Single,
            filing_status_id: 1,
            standard_deduction: StandardDeduction {
                tax_year: 2025,
                filing_status_id: 1,
                base_amount: dec!(15000),
                additional_amount: dec!(2000),
            },
            brackets: BracketTable::new(single_brackets_2025()).unwrap(),
            amt,
            capital_gains: CapitalGainsThresholds {
                tax_year: 2025,
                filing_status_id: 1,
                zero_rate_max: dec!(48350),
                fifteen_rate_max: dec!(533400),
            },
            ira_deduction_phaseout: Some(
                PhaseoutRange::new(dec!(79000), dec!(89000)).unwrap(),
            ),
            roth_contribution_phaseout: Some(
                PhaseoutRange::new(dec!(150000), dec!(165000)).unwrap(),
            ),
            student_loan_phaseout: Some(
                PhaseoutRange::new(dec!(85000), dec!(100000)).unwrap(),
            ),
            year_config,
        }
    }

    fn engine() -> TaxComputationEngine {
        TaxComputationEngine::new(single_params())
    }

    fn wage_return(wages: Decimal) -> ReturnInput {
        let mut input = ReturnInput::new(TaxpayerProfile::new(FilingStatusCode::Single));
        input.income.wages = wages;
        input
    }

    // =========================================================================
    // basic pipeline
    // =========================================================================

    #[test]
    fn wage_earner_standard_deduction() {
        let result = engine().calculate(&wage_return(dec!(100000))).unwrap();

        assert_eq!(result.gross_income, dec!(100000));
        assert_eq!(result.adjusted_gross_income, dec!(100000));
        assert_eq!(result.standard_deduction, dec!(15000));
        assert!(!result.used_itemized);
        assert_eq!(result.taxable_income, dec!(85000));
        // 5578.50 + (85000 - 48475) × 0.22 = 13614
        assert_eq!(result.regular_tax, dec!(13614.00));
        assert_eq!(result.amt.amt_liability, dec!(0));
        assert_eq!(result.total_tax, dec!(13614.00));
        assert_eq!(result.balance_due, dec!(13614.00));
        assert_eq!(result.refund, dec!(0));
    }

    #[test]
    fn withholding_above_tax_produces_refund() {
        let mut input = wage_return(dec!(100000));
        input.withholding = dec!(15000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.balance_due, dec!(0));
        assert_eq!(result.refund, dec!(1386.00));
    }

    #[test]
    fn deductions_above_agi_clamp_taxable_income_to_zero() {
        let result = engine().calculate(&wage_return(dec!(9000))).unwrap();

        assert_eq!(result.taxable_income, dec!(0));
        assert_eq!(result.total_tax, dec!(0));
    }

    #[test]
    fn itemized_deductions_win_when_larger() {
        let mut input = wage_return(dec!(200000));
        let mut set = ItemizedDeductionSet::empty();
        set.state_local_income_taxes = dec!(12000); // capped at 10000
        set.mortgage_interest = dec!(18000);
        set.charitable_cash = dec!(5000);
        input.itemized = Some(set);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.itemized_deduction, dec!(33000));
        assert!(result.used_itemized);
        assert_eq!(result.taxable_income, dec!(167000));
    }

    #[test]
    fn small_itemized_set_loses_to_standard() {
        let mut input = wage_return(dec!(100000));
        let mut set = ItemizedDeductionSet::empty();
        set.charitable_cash = dec!(2000);
        input.itemized = Some(set);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.deduction_applied, dec!(15000));
        assert!(!result.used_itemized);
    }

    // =========================================================================
    // adjustments and phaseouts
    // =========================================================================

    #[test]
    fn base_adjustments_are_capped() {
        let mut input = wage_return(dec!(100000));
        input.adjustments.hsa_contribution = dec!(10000); // capped at 4300
        input.adjustments.educator_expenses = dec!(500); // capped at 300
        input.adjustments.se_tax_deduction = dec!(1000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(5600));
        assert_eq!(result.adjusted_gross_income, dec!(94400));
    }

    #[test]
    fn student_loan_interest_fully_deductible_below_band() {
        let mut input = wage_return(dec!(60000));
        input.adjustments.student_loan_interest = dec!(3000); // capped at 2500

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(2500));
    }

    #[test]
    fn student_loan_interest_phases_inside_band() {
        // MAGI 92500 is halfway through the 85000-100000 band.
        let mut input = wage_return(dec!(92500));
        input.adjustments.student_loan_interest = dec!(2500);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(1250));
    }

    #[test]
    fn student_loan_interest_gone_past_band() {
        let mut input = wage_return(dec!(150000));
        input.adjustments.student_loan_interest = dec!(2500);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(0));
    }

    #[test]
    fn ira_deduction_unphased_without_employer_plan() {
        let mut input = wage_return(dec!(200000));
        input.adjustments.traditional_ira_contribution = dec!(7000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(7000));
    }

    #[test]
    fn ira_deduction_phases_for_covered_filer() {
        // MAGI 84000 is halfway through the 79000-89000 band:
        // limit 7000 × 0.5 = 3500, already a multiple of ten.
        let mut input = wage_return(dec!(84000));
        input.profile.covered_by_employer_plan = true;
        input.adjustments.traditional_ira_contribution = dec!(7000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(3500));
    }

    #[test]
    fn ira_deduction_keeps_floor_near_band_end() {
        // MAGI 88900: 100 left of the band, 7000 × 0.01 = 70 → 70, floored
        // to 200.
        let mut input = wage_return(dec!(88900));
        input.profile.covered_by_employer_plan = true;
        input.adjustments.traditional_ira_contribution = dec!(7000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(200));
    }

    #[test]
    fn ira_deduction_zero_for_covered_filer_past_band() {
        let mut input = wage_return(dec!(120000));
        input.profile.covered_by_employer_plan = true;
        input.adjustments.traditional_ira_contribution = dec!(7000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_adjustments, dec!(0));
    }

    #[test]
    fn roth_allowance_tracks_phaseout_without_touching_agi() {
        let mut input = wage_return(dec!(157500)); // halfway through 150000-165000
        input.adjustments.roth_ira_contribution = dec!(7000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.roth_contribution_allowed, dec!(3500));
        assert_eq!(result.adjusted_gross_income, dec!(157500));
    }

    #[test]
    fn roth_allowance_bounded_by_actual_contribution() {
        let mut input = wage_return(dec!(100000));
        input.adjustments.roth_ira_contribution = dec!(2000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.roth_contribution_allowed, dec!(2000));
    }

    // =========================================================================
    // preferential income
    // =========================================================================

    #[test]
    fn long_term_gains_inside_zero_tier_are_untaxed() {
        let mut input = wage_return(dec!(40000));
        input.income.long_term_capital_gains = dec!(20000);

        let result = engine().calculate(&input).unwrap();

        // Taxable 45000, ordinary 25000, preferential 20000 all below the
        // 48350 zero-rate top.
        assert_eq!(result.taxable_income, dec!(45000));
        assert_eq!(result.preferential_tax, dec!(0));
        // Ordinary: 1192.50 + (25000 - 11925) × 0.12 = 2761.50
        assert_eq!(result.regular_tax, dec!(2761.50));
    }

    #[test]
    fn preferential_income_straddles_zero_and_fifteen_tiers() {
        let mut input = wage_return(dec!(55000));
        input.income.long_term_capital_gains = dec!(20000);

        let result = engine().calculate(&input).unwrap();

        // Taxable 60000, ordinary 40000, preferential 20000.
        // Zero tier holds 48350 − 40000 = 8350; remaining 11650 at 15%.
        assert_eq!(result.preferential_tax, dec!(1747.50));
    }

    #[test]
    fn preferential_income_reaches_top_tier() {
        let mut input = wage_return(dec!(600000));
        input.income.long_term_capital_gains = dec!(100000);

        let result = engine().calculate(&input).unwrap();

        // Taxable 685000, ordinary 585000 is past the fifteen-rate top, so
        // the whole 100000 takes the top rate.
        assert_eq!(result.preferential_tax, dec!(20000.00));
        // Ordinary: 57231 + (585000 − 250525) × 0.35 = 174297.25
        assert_eq!(result.ordinary_tax, dec!(174297.25));
        assert_eq!(result.regular_tax, dec!(194297.25));
    }

    #[test]
    fn qualified_dividends_count_as_preferential() {
        let mut input = wage_return(dec!(40000));
        input.income.ordinary_dividends = dec!(5000);
        input.income.qualified_dividends = dec!(5000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.taxable_income, dec!(30000));
        // Ordinary 25000, preferential 5000 inside the zero tier.
        assert_eq!(result.preferential_tax, dec!(0));
    }

    // =========================================================================
    // AMT integration
    // =========================================================================

    #[test]
    fn iso_exercise_triggers_amt() {
        // AGI 700000 single filer with a 300000 ISO spread.
        let mut input = wage_return(dec!(700000));
        input.preferences.iso_exercise_spread = dec!(300000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.taxable_income, dec!(685000));
        assert_eq!(result.regular_tax, dec!(210470.25));
        assert_eq!(result.amt.amti, dec!(985000));
        assert_eq!(result.amt.exemption_after_phaseout, dec!(0));
        assert_eq!(result.amt.amt_liability, dec!(60547.75));
        assert_eq!(result.total_tax, dec!(271018.00));
    }

    #[test]
    fn salt_addback_applies_only_when_itemizing() {
        let mut input = wage_return(dec!(300000));
        let mut set = ItemizedDeductionSet::empty();
        set.state_local_income_taxes = dec!(15000); // capped at 10000
        set.mortgage_interest = dec!(25000);
        input.itemized = Some(set);

        let itemizing = engine().calculate(&input).unwrap();
        assert!(itemizing.used_itemized);
        // AMTI = taxable income + SALT actually deducted.
        assert_eq!(
            itemizing.amt.amti,
            itemizing.taxable_income + dec!(10000)
        );

        input.itemized = None;
        let standard = engine().calculate(&input).unwrap();
        assert_eq!(standard.amt.amti, standard.taxable_income);
    }

    // =========================================================================
    // credits and settlement
    // =========================================================================

    #[test]
    fn nonrefundable_credits_stop_at_zero() {
        let mut input = wage_return(dec!(30000));
        input.nonrefundable_credits = dec!(10000);

        let result = engine().calculate(&input).unwrap();

        // Tax before credits: 1192.50 + (15000 − 11925) × 0.12 = 1561.50
        assert_eq!(result.nonrefundable_credits_applied, dec!(1561.50));
        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.refund, dec!(0));
    }

    #[test]
    fn refundable_credits_can_produce_refund() {
        let mut input = wage_return(dec!(30000));
        input.nonrefundable_credits = dec!(10000);
        input.refundable_credits = dec!(1200);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_tax, dec!(0));
        assert_eq!(result.refund, dec!(1200));
    }

    #[test]
    fn estimated_payments_count_toward_settlement() {
        let mut input = wage_return(dec!(100000));
        input.withholding = dec!(5000);
        input.estimated_payments = dec!(6000);

        let result = engine().calculate(&input).unwrap();

        assert_eq!(result.total_payments, dec!(11000));
        assert_eq!(result.balance_due, dec!(2614.00));
    }

    // =========================================================================
    // validation and guards
    // =========================================================================

    #[test]
    fn negative_input_is_rejected_with_field_name() {
        let mut input = wage_return(dec!(50000));
        input.withholding = dec!(-1);

        let result = engine().calculate(&input);

        assert!(matches!(
            result,
            Err(EngineError::Validation(ValidationError::NegativeAmount {
                field: "withholding",
                ..
            }))
        ));
    }

    #[test]
    fn filing_status_mismatch_is_rejected() {
        let input = ReturnInput::new(TaxpayerProfile::new(
            FilingStatusCode::MarriedFilingJointly,
        ));

        let result = engine().calculate(&input);

        assert!(matches!(
            result,
            Err(EngineError::FilingStatusMismatch { .. })
        ));
    }

    #[test]
    fn breakdown_projects_to_saved_record() {
        let result = engine().calculate(&wage_return(dec!(100000))).unwrap();

        let saved = result.to_saved(2025, 1);

        assert_eq!(saved.tax_year, 2025);
        assert_eq!(saved.filing_status_id, 1);
        assert_eq!(saved.taxable_income, dec!(85000));
        assert_eq!(saved.total_tax, dec!(13614.00));
        assert_eq!(saved.amt_liability, dec!(0));
    }
}
