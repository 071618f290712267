mod adjustments;
mod amt_parameters;
mod bracket;
mod capital_gains;
mod filing_status;
mod income_snapshot;
mod itemized;
mod phaseout;
mod saved_computation;
mod standard_deduction;
mod taxpayer_profile;
mod validation;
mod year_config;

pub use adjustments::AdjustmentSet;
pub use amt_parameters::AmtParameters;
pub use bracket::{BracketTable, BracketTableError, TaxBracket};
pub use capital_gains::CapitalGainsThresholds;
pub use filing_status::{FilingStatus, FilingStatusCode};
pub use income_snapshot::IncomeSnapshot;
pub use itemized::ItemizedDeductionSet;
pub use phaseout::{PhaseoutKind, PhaseoutRange, PhaseoutRangeError};
pub use saved_computation::{NewSavedComputation, SavedComputation};
pub use standard_deduction::StandardDeduction;
pub use taxpayer_profile::TaxpayerProfile;
pub use validation::ValidationError;
pub(crate) use validation::require_non_negative;
pub use year_config::YearConfig;

#[cfg(test)]
pub(crate) use year_config::test_year_config_2025;
