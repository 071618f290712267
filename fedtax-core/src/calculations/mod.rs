//! Calculation pipeline for federal returns: phaseouts, the mortgage
//! interest limiter, deduction selection, AMT, and the engine composing
//! them. All calculators are pure functions over value objects.

pub mod amt;
pub mod common;
pub mod deductions;
pub mod engine;
pub mod mortgage;
pub mod phaseout;

pub use amt::{AmtConfig, AmtError, AmtResult, AmtWorksheet, PreferenceItems};
pub use deductions::{
    DeductionChoice, DeductionSelector, ItemizedResult, ItemizedWorksheet,
    StandardDeductionCalculator,
};
pub use engine::{
    ComputationBreakdown, EngineError, EngineParameters, ReturnInput, TaxComputationEngine,
};
pub use mortgage::{MortgageCeilings, MortgageError, MortgageInterestLimiter, MortgageInterestResult};
pub use phaseout::{PhaseoutRounding, phase_out};
