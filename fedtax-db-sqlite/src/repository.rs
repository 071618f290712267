use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, sqlite::SqlitePool};

use fedtax_core::{
    AmtParameters, CapitalGainsThresholds, FilingRepository, FilingStatus, FilingStatusCode,
    NewSavedComputation, PhaseoutKind, PhaseoutRange, RepositoryError, SavedComputation,
    StandardDeduction, TaxBracket, YearConfig,
};

use crate::decimal::{decimal_to_f64, get_decimal, get_optional_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .with_context(|| format!("Failed to connect to database: {database_url}"))?;
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Executes every `.sql` file in `seeds_dir` in filename order.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn db_err(e: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Database(e.to_string())
}

fn row_to_filing_status(row: &sqlx::sqlite::SqliteRow) -> Result<FilingStatus, RepositoryError> {
    let code: String = row.try_get("status_code").map_err(db_err)?;
    let status_code = FilingStatusCode::parse(&code)
        .ok_or_else(|| RepositoryError::Database(format!("unknown filing status code '{code}'")))?;
    Ok(FilingStatus {
        id: row.try_get("id").map_err(db_err)?,
        status_code,
        status_name: row.try_get("status_name").map_err(db_err)?,
    })
}

fn row_to_bracket(row: &sqlx::sqlite::SqliteRow) -> Result<TaxBracket, RepositoryError> {
    Ok(TaxBracket {
        tax_year: row.try_get("tax_year").map_err(db_err)?,
        filing_status_id: row.try_get("filing_status_id").map_err(db_err)?,
        min_income: get_decimal(row, "min_income")?,
        max_income: get_optional_decimal(row, "max_income")?,
        tax_rate: get_decimal(row, "tax_rate")?,
        base_tax: get_decimal(row, "base_tax")?,
    })
}

fn row_to_saved_computation(
    row: &sqlx::sqlite::SqliteRow,
) -> Result<SavedComputation, RepositoryError> {
    Ok(SavedComputation {
        id: row.try_get("id").map_err(db_err)?,
        tax_year: row.try_get("tax_year").map_err(db_err)?,
        filing_status_id: row.try_get("filing_status_id").map_err(db_err)?,
        gross_income: get_decimal(row, "gross_income")?,
        adjusted_gross_income: get_decimal(row, "adjusted_gross_income")?,
        deduction_applied: get_decimal(row, "deduction_applied")?,
        used_itemized: row.try_get("used_itemized").map_err(db_err)?,
        taxable_income: get_decimal(row, "taxable_income")?,
        regular_tax: get_decimal(row, "regular_tax")?,
        amt_liability: get_decimal(row, "amt_liability")?,
        total_tax: get_decimal(row, "total_tax")?,
        balance_due: get_decimal(row, "balance_due")?,
        refund: get_decimal(row, "refund")?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(db_err)?,
        updated_at: row
            .try_get::<DateTime<Utc>, _>("updated_at")
            .map_err(db_err)?,
    })
}

#[async_trait]
impl FilingRepository for SqliteRepository {
    async fn get_year_config(
        &self,
        year: i32,
    ) -> Result<YearConfig, RepositoryError> {
        let row = sqlx::query(
            "SELECT tax_year, salt_cap, medical_agi_floor,
                    mortgage_ceiling, mortgage_ceiling_grandfathered,
                    amt_low_rate, amt_high_rate,
                    ira_contribution_limit, student_loan_interest_cap,
                    hsa_contribution_cap, educator_expense_cap,
                    dependent_deduction_base, dependent_earned_income_addon,
                    preferential_mid_rate, preferential_top_rate,
                    charitable_cash_agi_rate, charitable_noncash_agi_rate
             FROM tax_year_config WHERE tax_year = ?",
        )
        .bind(year)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(YearConfig {
            tax_year: row.try_get("tax_year").map_err(db_err)?,
            salt_cap: get_decimal(&row, "salt_cap")?,
            medical_agi_floor: get_decimal(&row, "medical_agi_floor")?,
            mortgage_ceiling: get_decimal(&row, "mortgage_ceiling")?,
            mortgage_ceiling_grandfathered: get_decimal(&row, "mortgage_ceiling_grandfathered")?,
            amt_low_rate: get_decimal(&row, "amt_low_rate")?,
            amt_high_rate: get_decimal(&row, "amt_high_rate")?,
            ira_contribution_limit: get_decimal(&row, "ira_contribution_limit")?,
            student_loan_interest_cap: get_decimal(&row, "student_loan_interest_cap")?,
            hsa_contribution_cap: get_decimal(&row, "hsa_contribution_cap")?,
            educator_expense_cap: get_decimal(&row, "educator_expense_cap")?,
            dependent_deduction_base: get_decimal(&row, "dependent_deduction_base")?,
            dependent_earned_income_addon: get_decimal(&row, "dependent_earned_income_addon")?,
            preferential_mid_rate: get_decimal(&row, "preferential_mid_rate")?,
            preferential_top_rate: get_decimal(&row, "preferential_top_rate")?,
            charitable_cash_agi_rate: get_decimal(&row, "charitable_cash_agi_rate")?,
            charitable_noncash_agi_rate: get_decimal(&row, "charitable_noncash_agi_rate")?,
        })
    }

    async fn list_tax_years(&self) -> Result<Vec<i32>, RepositoryError> {
        let rows = sqlx::query("SELECT tax_year FROM tax_year_config ORDER BY tax_year DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter()
            .map(|row| row.try_get("tax_year").map_err(db_err))
            .collect()
    }

    async fn get_filing_status(
        &self,
        id: i32,
    ) -> Result<FilingStatus, RepositoryError> {
        let row = sqlx::query("SELECT id, status_code, status_name FROM filing_status WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or(RepositoryError::NotFound)?;

        row_to_filing_status(&row)
    }

    async fn get_filing_status_by_code(
        &self,
        code: &str,
    ) -> Result<FilingStatus, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, status_code, status_name FROM filing_status WHERE status_code = ?",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_filing_status(&row)
    }

    async fn list_filing_statuses(&self) -> Result<Vec<FilingStatus>, RepositoryError> {
        let rows = sqlx::query("SELECT id, status_code, status_name FROM filing_status ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(db_err)?;

        rows.iter().map(row_to_filing_status).collect()
    }

    async fn get_standard_deduction(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<StandardDeduction, RepositoryError> {
        let row = sqlx::query(
            "SELECT tax_year, filing_status_id, base_amount, additional_amount
             FROM standard_deductions
             WHERE tax_year = ? AND filing_status_id = ?",
        )
        .bind(tax_year)
        .bind(filing_status_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(StandardDeduction {
            tax_year: row.try_get("tax_year").map_err(db_err)?,
            filing_status_id: row.try_get("filing_status_id").map_err(db_err)?,
            base_amount: get_decimal(&row, "base_amount")?,
            additional_amount: get_decimal(&row, "additional_amount")?,
        })
    }

    async fn get_tax_brackets(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<Vec<TaxBracket>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT tax_year, filing_status_id, min_income, max_income, tax_rate, base_tax
             FROM tax_brackets
             WHERE tax_year = ? AND filing_status_id = ?
             ORDER BY min_income",
        )
        .bind(tax_year)
        .bind(filing_status_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)?;

        rows.iter().map(row_to_bracket).collect()
    }

    async fn insert_tax_bracket(
        &self,
        bracket: &TaxBracket,
    ) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO tax_brackets (tax_year, filing_status_id, min_income, max_income, tax_rate, base_tax)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(bracket.tax_year)
        .bind(bracket.filing_status_id)
        .bind(decimal_to_f64(bracket.min_income))
        .bind(bracket.max_income.map(decimal_to_f64))
        .bind(decimal_to_f64(bracket.tax_rate))
        .bind(decimal_to_f64(bracket.base_tax))
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn delete_tax_brackets(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM tax_brackets WHERE tax_year = ? AND filing_status_id = ?")
            .bind(tax_year)
            .bind(filing_status_id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(())
    }

    async fn get_amt_parameters(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<AmtParameters, RepositoryError> {
        let row = sqlx::query(
            "SELECT tax_year, filing_status_id, exemption, phaseout_start, phaseout_end, rate_breakpoint
             FROM amt_parameters
             WHERE tax_year = ? AND filing_status_id = ?",
        )
        .bind(tax_year)
        .bind(filing_status_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(AmtParameters {
            tax_year: row.try_get("tax_year").map_err(db_err)?,
            filing_status_id: row.try_get("filing_status_id").map_err(db_err)?,
            exemption: get_decimal(&row, "exemption")?,
            phaseout_start: get_decimal(&row, "phaseout_start")?,
            phaseout_end: get_decimal(&row, "phaseout_end")?,
            rate_breakpoint: get_decimal(&row, "rate_breakpoint")?,
        })
    }

    async fn get_phaseout_range(
        &self,
        tax_year: i32,
        filing_status_id: i32,
        kind: PhaseoutKind,
    ) -> Result<PhaseoutRange, RepositoryError> {
        let row = sqlx::query(
            "SELECT range_start, range_end
             FROM phaseout_ranges
             WHERE tax_year = ? AND filing_status_id = ? AND kind = ?",
        )
        .bind(tax_year)
        .bind(filing_status_id)
        .bind(kind.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        let start = get_decimal(&row, "range_start")?;
        let end = get_decimal(&row, "range_end")?;
        PhaseoutRange::new(start, end).map_err(db_err)
    }

    async fn get_capital_gains_thresholds(
        &self,
        tax_year: i32,
        filing_status_id: i32,
    ) -> Result<CapitalGainsThresholds, RepositoryError> {
        let row = sqlx::query(
            "SELECT tax_year, filing_status_id, zero_rate_max, fifteen_rate_max
             FROM capital_gains_thresholds
             WHERE tax_year = ? AND filing_status_id = ?",
        )
        .bind(tax_year)
        .bind(filing_status_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        Ok(CapitalGainsThresholds {
            tax_year: row.try_get("tax_year").map_err(db_err)?,
            filing_status_id: row.try_get("filing_status_id").map_err(db_err)?,
            zero_rate_max: get_decimal(&row, "zero_rate_max")?,
            fifteen_rate_max: get_decimal(&row, "fifteen_rate_max")?,
        })
    }

    async fn create_computation(
        &self,
        computation: NewSavedComputation,
    ) -> Result<SavedComputation, RepositoryError> {
        let now = Utc::now();

        let result = sqlx::query(
            "INSERT INTO saved_computations (
                tax_year, filing_status_id, gross_income, adjusted_gross_income,
                deduction_applied, used_itemized, taxable_income, regular_tax,
                amt_liability, total_tax, balance_due, refund,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(computation.tax_year)
        .bind(computation.filing_status_id)
        .bind(decimal_to_f64(computation.gross_income))
        .bind(decimal_to_f64(computation.adjusted_gross_income))
        .bind(decimal_to_f64(computation.deduction_applied))
        .bind(computation.used_itemized)
        .bind(decimal_to_f64(computation.taxable_income))
        .bind(decimal_to_f64(computation.regular_tax))
        .bind(decimal_to_f64(computation.amt_liability))
        .bind(decimal_to_f64(computation.total_tax))
        .bind(decimal_to_f64(computation.balance_due))
        .bind(decimal_to_f64(computation.refund))
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        self.get_computation(result.last_insert_rowid()).await
    }

    async fn get_computation(
        &self,
        id: i64,
    ) -> Result<SavedComputation, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, tax_year, filing_status_id, gross_income, adjusted_gross_income,
                    deduction_applied, used_itemized, taxable_income, regular_tax,
                    amt_liability, total_tax, balance_due, refund, created_at, updated_at
             FROM saved_computations WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?
        .ok_or(RepositoryError::NotFound)?;

        row_to_saved_computation(&row)
    }

    async fn delete_computation(
        &self,
        id: i64,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM saved_computations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn list_computations(
        &self,
        tax_year: Option<i32>,
    ) -> Result<Vec<SavedComputation>, RepositoryError> {
        const COLUMNS: &str = "id, tax_year, filing_status_id, gross_income, adjusted_gross_income,
                    deduction_applied, used_itemized, taxable_income, regular_tax,
                    amt_liability, total_tax, balance_due, refund, created_at, updated_at";

        let rows = match tax_year {
            Some(year) => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM saved_computations WHERE tax_year = ? ORDER BY created_at DESC"
                ))
                .bind(year)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query(&format!(
                    "SELECT {COLUMNS} FROM saved_computations ORDER BY created_at DESC"
                ))
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(db_err)?;

        rows.iter().map(row_to_saved_computation).collect()
    }
}
