//! Mortgage interest limitation against the acquisition-debt ceiling.
//!
//! When outstanding acquisition principal exceeds the applicable ceiling,
//! only the ceiling's share of interest and points is deductible. Interest
//! and points are each prorated and rounded to cents independently before
//! summing. Home-equity interest on debt not used to buy, build, or improve
//! the home is tracked but never deductible.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fedtax_core::FilingStatusCode;
//! use fedtax_core::calculations::{MortgageCeilings, MortgageInterestLimiter};
//!
//! let ceilings = MortgageCeilings {
//!     current_law: dec!(750000),
//!     grandfathered: dec!(1000000),
//! };
//!
//! let limiter = MortgageInterestLimiter::new(ceilings, FilingStatusCode::Single);
//!
//! // $1M principal against the $750k ceiling: 75% of interest survives.
//! let result = limiter.calculate(dec!(50000), dec!(0), dec!(1000000), false).unwrap();
//! assert_eq!(result.deductible_interest, dec!(37500));
//! assert!(result.limited);
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::calculations::common::round_half_up;
use crate::models::FilingStatusCode;

/// Errors raised by the mortgage interest limiter.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MortgageError {
    /// A debt ceiling must be positive.
    #[error("mortgage debt ceiling must be positive, got {0}")]
    InvalidCeiling(Decimal),
}

/// Acquisition-debt ceilings for a tax year, before the separate-filer
/// halving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageCeilings {
    /// Ceiling for debt under current law ($750,000).
    pub current_law: Decimal,
    /// Ceiling for grandfathered debt ($1,000,000).
    pub grandfathered: Decimal,
}

/// Result of the limitation, with the applied ceiling for transparency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MortgageInterestResult {
    pub deductible_interest: Decimal,
    pub deductible_points: Decimal,
    /// `deductible_interest + deductible_points`, each rounded to cents
    /// before summing.
    pub deductible_total: Decimal,
    /// Ceiling used for the proration (after any separate-filer halving).
    pub ceiling_applied: Decimal,
    /// Whether the proration actually reduced the deduction.
    pub limited: bool,
}

/// Calculator for the deductible share of mortgage interest and points.
#[derive(Debug, Clone)]
pub struct MortgageInterestLimiter {
    ceilings: MortgageCeilings,
    filing_status: FilingStatusCode,
}

impl MortgageInterestLimiter {
    pub fn new(ceilings: MortgageCeilings, filing_status: FilingStatusCode) -> Self {
        Self {
            ceilings,
            filing_status,
        }
    }

    /// Ceiling applicable to this filer: the current-law or grandfathered
    /// amount, halved for married-filing-separately.
    pub fn applicable_ceiling(&self, grandfathered: bool) -> Decimal {
        let base = if grandfathered {
            self.ceilings.grandfathered
        } else {
            self.ceilings.current_law
        };
        if self.filing_status.is_separate() {
            base / Decimal::TWO
        } else {
            base
        }
    }

    /// Computes the deductible share of `interest` and `points` given the
    /// average outstanding `principal`.
    ///
    /// A non-positive principal means the balance is unknown and the full
    /// amount is allowed (backward-compatible default). Principal at or
    /// under the ceiling is likewise unlimited. Above the ceiling, each
    /// component is scaled by `ceiling / principal` and rounded to cents
    /// independently.
    ///
    /// # Errors
    ///
    /// Returns [`MortgageError::InvalidCeiling`] if the applicable ceiling
    /// is not positive.
    pub fn calculate(
        &self,
        interest: Decimal,
        points: Decimal,
        principal: Decimal,
        grandfathered: bool,
    ) -> Result<MortgageInterestResult, MortgageError> {
        let ceiling = self.applicable_ceiling(grandfathered);
        if ceiling <= Decimal::ZERO {
            return Err(MortgageError::InvalidCeiling(ceiling));
        }

        if principal <= Decimal::ZERO || principal <= ceiling {
            let interest = round_half_up(interest);
            let points = round_half_up(points);
            return Ok(MortgageInterestResult {
                deductible_interest: interest,
                deductible_points: points,
                deductible_total: interest + points,
                ceiling_applied: ceiling,
                limited: false,
            });
        }

        let ratio = ceiling / principal;
        let deductible_interest = round_half_up(interest * ratio);
        let deductible_points = round_half_up(points * ratio);

        debug!(
            %principal,
            %ceiling,
            %ratio,
            "mortgage principal exceeds ceiling; prorating interest and points"
        );

        Ok(MortgageInterestResult {
            deductible_interest,
            deductible_points,
            deductible_total: deductible_interest + deductible_points,
            ceiling_applied: ceiling,
            limited: true,
        })
    }
}
