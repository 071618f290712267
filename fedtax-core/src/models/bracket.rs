use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::calculations::common::round_half_up;

/// One row of a rate schedule: base tax at the bracket floor plus a marginal
/// rate on income above it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub tax_year: i32,
    pub filing_status_id: i32,
    pub min_income: Decimal,
    /// `None` marks the top, unbounded bracket.
    pub max_income: Option<Decimal>,
    pub tax_rate: Decimal,
    pub base_tax: Decimal,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("bracket table is empty")]
    Empty,

    #[error("first bracket must start at zero, got {0}")]
    NonZeroFloor(Decimal),

    #[error("bracket starting at {actual} does not continue from {expected}")]
    Gap { expected: Decimal, actual: Decimal },

    #[error("only the last bracket may be unbounded")]
    UnboundedBelowTop,

    #[error("last bracket must be unbounded")]
    BoundedTop,
}

/// A validated rate schedule for one filing status and year.
///
/// Construction verifies the rows are contiguous from zero with a single
/// unbounded top bracket, so evaluation can never fall through.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketTable {
    brackets: Vec<TaxBracket>,
}

impl BracketTable {
    pub fn new(mut brackets: Vec<TaxBracket>) -> Result<Self, BracketTableError> {
        if brackets.is_empty() {
            return Err(BracketTableError::Empty);
        }

        brackets.sort_by(|a, b| a.min_income.cmp(&b.min_income));

        if brackets[0].min_income != Decimal::ZERO {
            return Err(BracketTableError::NonZeroFloor(brackets[0].min_income));
        }

        let last = brackets.len() - 1;
        for (i, bracket) in brackets.iter().enumerate() {
            match bracket.max_income {
                None if i != last => return Err(BracketTableError::UnboundedBelowTop),
                None => {}
                Some(_) if i == last => return Err(BracketTableError::BoundedTop),
                Some(max) => {
                    let next_min = brackets[i + 1].min_income;
                    if next_min != max {
                        return Err(BracketTableError::Gap {
                            expected: max,
                            actual: next_min,
                        });
                    }
                }
            }
        }

        Ok(Self { brackets })
    }

    pub fn brackets(&self) -> &[TaxBracket] {
        &self.brackets
    }

    /// Tax at the schedule's rates: the containing bracket's base tax plus
    /// the marginal rate on income above the bracket floor. Zero for
    /// non-positive income.
    pub fn tax_for(&self, taxable_income: Decimal) -> Decimal {
        if taxable_income <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        // Validation guarantees a containing bracket exists; the top bracket
        // is unbounded.
        let bracket = self
            .brackets
            .iter()
            .rev()
            .find(|b| taxable_income > b.min_income)
            .unwrap_or(&self.brackets[0]);

        let marginal = taxable_income - bracket.min_income;
        round_half_up(bracket.base_tax + marginal * bracket.tax_rate)
    }
}
