//! Bracket-schedule ingestion from IRS rate-schedule CSV files.
//!
//! The CSV carries one row per bracket, keyed by the IRS schedule code
//! rather than a filing status, because that is how the rate schedules are
//! published:
//!
//! - Schedule X → Single
//! - Schedule Y-1 → Married Filing Jointly and Qualifying Surviving Spouse
//! - Schedule Y-2 → Married Filing Separately
//! - Schedule Z → Head of Household
//!
//! Loading is idempotent per `(tax_year, schedule)`: existing brackets for
//! the mapped filing statuses are deleted before the new rows are inserted,
//! so re-running a load converges to the same state.

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::info;

use fedtax_core::{FilingRepository, RepositoryError, TaxBracket};

/// Errors that can occur when loading bracket schedules.
#[derive(Debug, Error)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("unknown rate schedule '{0}'")]
    UnknownSchedule(String),

    #[error("filing status '{0}' not found in database (have you run the migrations?)")]
    FilingStatusNotFound(String),

    #[error("tax year {0} not found in database (have you run the seeds?)")]
    TaxYearNotFound(i32),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// Filing status codes a published rate schedule applies to.
fn schedule_filing_status_codes(
    schedule: &str,
) -> Result<&'static [&'static str], ScheduleLoaderError> {
    match schedule {
        "X" => Ok(&["S"]),
        "Y-1" => Ok(&["MFJ", "QSS"]),
        "Y-2" => Ok(&["MFS"]),
        "Z" => Ok(&["HOH"]),
        other => Err(ScheduleLoaderError::UnknownSchedule(other.to_string())),
    }
}

/// One row of a rate-schedule CSV.
///
/// Columns: `tax_year`, `schedule` (X, Y-1, Y-2, Z), `min_income`,
/// `max_income` (empty for the unbounded top bracket), `base_tax`, `rate`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    pub tax_year: i32,
    pub schedule: String,
    pub min_income: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub max_income: Option<Decimal>,
    pub base_tax: Decimal,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for bracket schedules. Parses CSV and writes through the
/// repository trait, so it works against any registered backend.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parses schedule records from any CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScheduleRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Loads schedule records into the database and returns the number of
    /// bracket rows inserted.
    ///
    /// For each `(tax_year, schedule)` group: resolve the filing statuses,
    /// delete their existing brackets for that year, and insert the new
    /// rows. Schedule Y-1 fans out to both MFJ and QSS.
    pub async fn load<R: FilingRepository + ?Sized>(
        repo: &R,
        records: &[ScheduleRecord],
    ) -> Result<usize, ScheduleLoaderError> {
        let mut groups: std::collections::HashMap<(i32, String), Vec<&ScheduleRecord>> =
            std::collections::HashMap::new();
        for record in records {
            groups
                .entry((record.tax_year, record.schedule.clone()))
                .or_default()
                .push(record);
        }

        let mut inserted = 0;
        for ((tax_year, schedule), group_records) in groups {
            let status_codes = schedule_filing_status_codes(&schedule)?;

            for status_code in status_codes {
                let filing_status = repo
                    .get_filing_status_by_code(status_code)
                    .await
                    .map_err(|e| match e {
                        RepositoryError::NotFound => {
                            ScheduleLoaderError::FilingStatusNotFound(status_code.to_string())
                        }
                        other => ScheduleLoaderError::Repository(other),
                    })?;

                repo.delete_tax_brackets(tax_year, filing_status.id).await?;

                for record in &group_records {
                    let bracket = TaxBracket {
                        tax_year: record.tax_year,
                        filing_status_id: filing_status.id,
                        min_income: record.min_income,
                        max_income: record.max_income,
                        tax_rate: record.rate,
                        base_tax: record.base_tax,
                    };

                    repo.insert_tax_bracket(&bracket).await.map_err(|e| {
                        if let RepositoryError::Database(ref inner) = e {
                            if inner.contains("FOREIGN KEY constraint failed") {
                                return ScheduleLoaderError::TaxYearNotFound(record.tax_year);
                            }
                        }
                        ScheduleLoaderError::Repository(e)
                    })?;
                    inserted += 1;
                }

                info!(
                    tax_year,
                    schedule = %schedule,
                    status = status_code,
                    brackets = group_records.len(),
                    "loaded rate schedule"
                );
            }
        }

        Ok(inserted)
    }
}
