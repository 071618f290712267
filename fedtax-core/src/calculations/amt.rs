//! Alternative Minimum Tax calculation.
//!
//! Five strictly ordered sub-calculations, no branching back:
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | AMTI: taxable income (clamped at zero) + preference add-backs + SALT add-back |
//! | 2    | Exemption after the AMTI phaseout, floored at zero |
//! | 3    | AMT base: AMTI minus remaining exemption, floored at zero |
//! | 4    | Tentative minimum tax: 26% up to the breakpoint, 28% above |
//! | 5    | AMT liability: TMT minus regular tax minus prior-year credit, floored at zero |
//!
//! The pipeline holds no state between calls; it is a pure function of its
//! inputs, composed here so each step's output feeds the next exactly once.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fedtax_core::calculations::{AmtConfig, AmtWorksheet, PreferenceItems};
//!
//! let config = AmtConfig::new(
//!     dec!(88100),    // exemption
//!     dec!(626350),   // phaseout start
//!     dec!(978750),   // phaseout end (start + 4 × exemption)
//!     dec!(239100),   // 28% breakpoint
//!     dec!(0.26),
//!     dec!(0.28),
//! ).unwrap();
//!
//! let worksheet = AmtWorksheet::new(config);
//! let mut preferences = PreferenceItems::empty();
//! preferences.iso_exercise_spread = dec!(300000);
//!
//! let result = worksheet
//!     .calculate(dec!(685000), &preferences, dec!(0), dec!(210470.25), dec!(0))
//!     .unwrap();
//!
//! assert_eq!(result.amti, dec!(985000));
//! assert_eq!(result.exemption_after_phaseout, dec!(0));
//! assert!(result.amt_liability > dec!(0));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{max, round_half_up};
use crate::calculations::phaseout::{PhaseoutRounding, phase_out};
use crate::models::{
    AmtParameters, PhaseoutRange, PhaseoutRangeError, ValidationError, YearConfig,
};

/// Errors that can occur during AMT calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AmtError {
    #[error("AMT exemption must be non-negative, got {0}")]
    InvalidExemption(Decimal),

    #[error("AMT rate must be between 0 and 1, got {0}")]
    InvalidRate(Decimal),

    #[error("AMT rate breakpoint must be positive, got {0}")]
    InvalidBreakpoint(Decimal),

    #[error("invalid AMT exemption phaseout: {0}")]
    InvalidPhaseout(#[from] PhaseoutRangeError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Preference-item add-backs entering AMTI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreferenceItems {
    /// Bargain element on incentive stock options exercised and not sold.
    pub iso_exercise_spread: Decimal,
    pub private_activity_bond_interest: Decimal,
    pub depreciation_adjustment: Decimal,
    pub passive_activity_adjustment: Decimal,
    pub depletion_excess: Decimal,
    pub other: Decimal,
}

impl PreferenceItems {
    pub fn empty() -> Self {
        Self {
            iso_exercise_spread: Decimal::ZERO,
            private_activity_bond_interest: Decimal::ZERO,
            depreciation_adjustment: Decimal::ZERO,
            passive_activity_adjustment: Decimal::ZERO,
            depletion_excess: Decimal::ZERO,
            other: Decimal::ZERO,
        }
    }

    pub fn total(&self) -> Decimal {
        self.iso_exercise_spread
            + self.private_activity_bond_interest
            + self.depreciation_adjustment
            + self.passive_activity_adjustment
            + self.depletion_excess
            + self.other
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        use crate::models::require_non_negative;

        require_non_negative("iso_exercise_spread", self.iso_exercise_spread)?;
        require_non_negative(
            "private_activity_bond_interest",
            self.private_activity_bond_interest,
        )?;
        require_non_negative("depreciation_adjustment", self.depreciation_adjustment)?;
        require_non_negative(
            "passive_activity_adjustment",
            self.passive_activity_adjustment,
        )?;
        require_non_negative("depletion_excess", self.depletion_excess)?;
        require_non_negative("other", self.other)?;
        Ok(())
    }
}

/// Validated AMT parameters for one filing status and year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmtConfig {
    exemption: Decimal,
    phaseout: PhaseoutRange,
    rate_breakpoint: Decimal,
    low_rate: Decimal,
    high_rate: Decimal,
}

impl AmtConfig {
    pub fn new(
        exemption: Decimal,
        phaseout_start: Decimal,
        phaseout_end: Decimal,
        rate_breakpoint: Decimal,
        low_rate: Decimal,
        high_rate: Decimal,
    ) -> Result<Self, AmtError> {
        if exemption < Decimal::ZERO {
            return Err(AmtError::InvalidExemption(exemption));
        }
        for rate in [low_rate, high_rate] {
            if rate <= Decimal::ZERO || rate >= Decimal::ONE {
                return Err(AmtError::InvalidRate(rate));
            }
        }
        if rate_breakpoint <= Decimal::ZERO {
            return Err(AmtError::InvalidBreakpoint(rate_breakpoint));
        }
        let phaseout = PhaseoutRange::new(phaseout_start, phaseout_end)?;

        Ok(Self {
            exemption,
            phaseout,
            rate_breakpoint,
            low_rate,
            high_rate,
        })
    }

    /// Assembles a config from the stored per-status parameters and the
    /// year's rates.
    pub fn from_parts(params: &AmtParameters, config: &YearConfig) -> Result<Self, AmtError> {
        Self::new(
            params.exemption,
            params.phaseout_start,
            params.phaseout_end,
            params.rate_breakpoint,
            config.amt_low_rate,
            config.amt_high_rate,
        )
    }
}

/// Result of the AMT calculation, intermediates included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmtResult {
    /// Alternative minimum taxable income (step 1).
    pub amti: Decimal,

    /// Exemption remaining after the phaseout (step 2).
    pub exemption_after_phaseout: Decimal,

    /// AMTI less the remaining exemption, floored at zero (step 3).
    pub amt_base: Decimal,

    /// Tentative minimum tax from the two-tier rate (step 4).
    pub tentative_minimum_tax: Decimal,

    /// Final liability over the regular tax, floored at zero (step 5).
    pub amt_liability: Decimal,
}

/// Calculator for the AMT pipeline.
#[derive(Debug, Clone)]
pub struct AmtWorksheet {
    config: AmtConfig,
}

impl AmtWorksheet {
    pub fn new(config: AmtConfig) -> Self {
        Self { config }
    }

    /// Runs the five ordered sub-calculations.
    ///
    /// `salt_addback` is the capped SALT amount actually deducted, zero when
    /// the return takes the standard deduction. Negative taxable income is
    /// clamped to zero before the preference add-backs.
    ///
    /// # Errors
    ///
    /// Returns [`AmtError::Validation`] if a preference item is negative.
    pub fn calculate(
        &self,
        taxable_income: Decimal,
        preferences: &PreferenceItems,
        salt_addback: Decimal,
        regular_tax: Decimal,
        prior_year_amt_credit: Decimal,
    ) -> Result<AmtResult, AmtError> {
        preferences.validate()?;

        // Step 1: AMTI.
        let amti = self.alternative_minimum_taxable_income(
            taxable_income,
            preferences,
            salt_addback,
        );

        // Step 2: exemption after phaseout.
        let exemption_after_phaseout = self.remaining_exemption(amti);

        // Step 3: AMT base.
        let amt_base = max(amti - exemption_after_phaseout, Decimal::ZERO);

        // Step 4: tentative minimum tax.
        let tentative_minimum_tax = self.tentative_minimum_tax(amt_base);

        // Step 5: liability over regular tax.
        let amt_liability = self.liability(
            tentative_minimum_tax,
            regular_tax,
            prior_year_amt_credit,
        );

        Ok(AmtResult {
            amti,
            exemption_after_phaseout,
            amt_base,
            tentative_minimum_tax,
            amt_liability,
        })
    }

    /// Step 1: taxable income clamped at zero, plus preference add-backs and
    /// the SALT add-back.
    fn alternative_minimum_taxable_income(
        &self,
        taxable_income: Decimal,
        preferences: &PreferenceItems,
        salt_addback: Decimal,
    ) -> Decimal {
        if taxable_income < Decimal::ZERO {
            warn!(
                %taxable_income,
                "negative taxable income clamped to zero before preference add-backs"
            );
        }
        max(taxable_income, Decimal::ZERO) + preferences.total() + max(salt_addback, Decimal::ZERO)
    }

    /// Step 2: exemption reduced via the linear phaseout against AMTI,
    /// floored at zero.
    fn remaining_exemption(&self, amti: Decimal) -> Decimal {
        let remaining = phase_out(
            self.config.exemption,
            amti,
            &self.config.phaseout,
            PhaseoutRounding::Cents,
        );
        max(remaining, Decimal::ZERO)
    }

    /// Step 4: two-tier rate over the AMT base.
    fn tentative_minimum_tax(&self, amt_base: Decimal) -> Decimal {
        if amt_base <= self.config.rate_breakpoint {
            return round_half_up(amt_base * self.config.low_rate);
        }

        let low_portion = self.config.rate_breakpoint * self.config.low_rate;
        let high_portion = (amt_base - self.config.rate_breakpoint) * self.config.high_rate;
        round_half_up(low_portion + high_portion)
    }

    /// Step 5: liability is what TMT exceeds the regular tax by, less any
    /// prior-year credit applied this year, never negative.
    fn liability(
        &self,
        tentative_minimum_tax: Decimal,
        regular_tax: Decimal,
        prior_year_amt_credit: Decimal,
    ) -> Decimal {
        let liability = tentative_minimum_tax - regular_tax - prior_year_amt_credit;
        if liability <= Decimal::ZERO {
            debug!(
                %tentative_minimum_tax,
                %regular_tax,
                "tentative minimum tax does not exceed regular tax; no AMT owed"
            );
            return Decimal::ZERO;
        }
        round_half_up(liability)
    }
}
