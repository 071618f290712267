use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Benefits whose phaseout ranges are stored per year and filing status.
///
/// A missing range for a `(year, status, kind)` combination means the
/// benefit is unavailable for that status (e.g. the student loan interest
/// deduction for married-filing-separately).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhaseoutKind {
    IraDeduction,
    RothContribution,
    StudentLoanInterest,
}

impl PhaseoutKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IraDeduction => "ira_deduction",
            Self::RothContribution => "roth_contribution",
            Self::StudentLoanInterest => "student_loan_interest",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ira_deduction" => Some(Self::IraDeduction),
            "roth_contribution" => Some(Self::RothContribution),
            "student_loan_interest" => Some(Self::StudentLoanInterest),
            _ => None,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PhaseoutRangeError {
    #[error("phaseout start must be non-negative, got {0}")]
    NegativeStart(Decimal),

    #[error("phaseout end {end} is below start {start}")]
    EndBelowStart { start: Decimal, end: Decimal },
}

/// Income band over which a benefit phases from full to zero.
///
/// `start == end` is allowed and acts as a step function at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseoutRange {
    start: Decimal,
    end: Decimal,
}

impl PhaseoutRange {
    pub fn new(start: Decimal, end: Decimal) -> Result<Self, PhaseoutRangeError> {
        if start < Decimal::ZERO {
            return Err(PhaseoutRangeError::NegativeStart(start));
        }
        if end < start {
            return Err(PhaseoutRangeError::EndBelowStart { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Decimal {
        self.start
    }

    pub fn end(&self) -> Decimal {
        self.end
    }

    pub fn width(&self) -> Decimal {
        self.end - self.start
    }
}
