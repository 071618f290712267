use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    AmtParameters, CapitalGainsThresholds, FilingStatus, NewSavedComputation, PhaseoutKind,
    PhaseoutRange, SavedComputation, StandardDeduction, TaxBracket, YearConfig,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(String),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Storage interface for year parameters and persisted computation runs.
///
/// A missing phaseout range is reported as [`RepositoryError::NotFound`];
/// callers treat it as "benefit unavailable for this filing status" rather
/// than as a failure. Saved computations are write-once: there is no update
/// method by design.
#[async_trait]
pub trait FilingRepository: Send + Sync {
    // Year configuration
    async fn get_year_config(&self, year: i32) -> Result<YearConfig, RepositoryError>;
    async fn list_tax_years(&self) -> Result<Vec<i32>, RepositoryError>;

    // Filing statuses
    async fn get_filing_status(&self, id: i32) -> Result<FilingStatus, RepositoryError>;
    async fn get_filing_status_by_code(
        &self,
        code: &str,
    ) -> Result<FilingStatus, RepositoryError>;
    async fn list_filing_statuses(&self) -> Result<Vec<FilingStatus>, RepositoryError>;

    // Standard deductions
    async fn get_standard_deduction(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<StandardDeduction, RepositoryError>;

    // Bracket tables
    async fn get_tax_brackets(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<Vec<TaxBracket>, RepositoryError>;

    async fn insert_tax_bracket(&self, bracket: &TaxBracket) -> Result<(), RepositoryError>;

    async fn delete_tax_brackets(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<(), RepositoryError>;

    // AMT parameters
    async fn get_amt_parameters(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<AmtParameters, RepositoryError>;

    // Phaseout ranges
    async fn get_phaseout_range(
        &self,
        tax_year: i32,
        filing_status_id: i32,
        kind: PhaseoutKind,
    ) -> Result<PhaseoutRange, RepositoryError>;

    // Preferential rate thresholds
    async fn get_capital_gains_thresholds(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<CapitalGainsThresholds, RepositoryError>;

    // Saved computations (write-once)
    async fn create_computation(
        &self,
        computation: NewSavedComputation,
    ) -> Result<SavedComputation, RepositoryError>;

    async fn get_computation(&self, id: i64) -> Result<SavedComputation, RepositoryError>;

    async fn delete_computation(&self, id: i64) -> Result<(), RepositoryError>;

    async fn list_computations(
        &self,
        tax_year: Option<i32>,
    ) -> Result<Vec<SavedComputation>, RepositoryError>;
}
