//! Decimal coercion for SQLite rows.
//!
//! SQLite has no decimal type; monetary columns are declared REAL but may
//! surface as INTEGER when the stored value is whole. These helpers accept
//! either, treating NULL as zero (or `None` for the optional variant).

use fedtax_core::RepositoryError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::{Row, TypeInfo, ValueRef};

/// Reads a decimal column, coercing INTEGER and REAL storage classes.
pub fn get_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Decimal, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("column '{column}' not found: {e}")))?;

    match value_ref.type_info().name() {
        "INTEGER" => {
            let value: i64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("integer read failed for '{column}': {e}"))
            })?;
            Ok(Decimal::from(value))
        }
        "REAL" => {
            let value: f64 = row.try_get(column).map_err(|e| {
                RepositoryError::Database(format!("real read failed for '{column}': {e}"))
            })?;
            Decimal::try_from(value).map_err(|e| {
                RepositoryError::Database(format!(
                    "cannot represent {value} from '{column}' as decimal: {e}"
                ))
            })
        }
        "NULL" => Ok(Decimal::ZERO),
        other => Err(RepositoryError::Database(format!(
            "unexpected type '{other}' for column '{column}'"
        ))),
    }
}

/// Reads an optional decimal column; NULL becomes `None`.
pub fn get_optional_decimal(
    row: &sqlx::sqlite::SqliteRow,
    column: &str,
) -> Result<Option<Decimal>, RepositoryError> {
    let value_ref = row
        .try_get_raw(column)
        .map_err(|e| RepositoryError::Database(format!("column '{column}' not found: {e}")))?;

    if value_ref.is_null() {
        return Ok(None);
    }
    get_decimal(row, column).map(Some)
}

/// Converts a decimal to f64 for REAL column storage.
pub fn decimal_to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;

    async fn setup_test_db() -> sqlx::sqlite::SqlitePool {
        let pool = SqlitePoolOptions::new()
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");
        sqlx::query(
            "CREATE TABLE coercion_probe (
                id INTEGER PRIMARY KEY,
                int_value INTEGER,
                real_value REAL,
                text_value TEXT
            )",
        )
        .execute(&pool)
        .await
        .expect("Failed to create probe table");
        pool
    }

    async fn fetch_probe_row(
        pool: &sqlx::sqlite::SqlitePool,
        insert: &str,
        select: &str,
    ) -> sqlx::sqlite::SqliteRow {
        sqlx::query(insert)
            .execute(pool)
            .await
            .expect("Failed to insert probe data");
        sqlx::query(select)
            .fetch_one(pool)
            .await
            .expect("Failed to fetch probe row")
    }

    #[tokio::test]
    async fn reads_integer_storage_as_decimal() {
        let pool = setup_test_db().await;
        let row = fetch_probe_row(
            &pool,
            "INSERT INTO coercion_probe (id, int_value) VALUES (1, 12345)",
            "SELECT int_value FROM coercion_probe WHERE id = 1",
        )
        .await;

        assert_eq!(get_decimal(&row, "int_value"), Ok(dec!(12345)));
    }

    #[tokio::test]
    async fn reads_real_storage_as_decimal() {
        let pool = setup_test_db().await;
        let row = fetch_probe_row(
            &pool,
            "INSERT INTO coercion_probe (id, real_value) VALUES (1, 123.45)",
            "SELECT real_value FROM coercion_probe WHERE id = 1",
        )
        .await;

        assert_eq!(get_decimal(&row, "real_value"), Ok(dec!(123.45)));
    }

    #[tokio::test]
    async fn null_reads_as_zero() {
        let pool = setup_test_db().await;
        let row = fetch_probe_row(
            &pool,
            "INSERT INTO coercion_probe (id, real_value) VALUES (1, NULL)",
            "SELECT real_value FROM coercion_probe WHERE id = 1",
        )
        .await;

        assert_eq!(get_decimal(&row, "real_value"), Ok(Decimal::ZERO));
    }

    #[tokio::test]
    async fn null_reads_as_none_for_optional() {
        let pool = setup_test_db().await;
        let row = fetch_probe_row(
            &pool,
            "INSERT INTO coercion_probe (id, real_value) VALUES (1, NULL)",
            "SELECT real_value FROM coercion_probe WHERE id = 1",
        )
        .await;

        assert_eq!(get_optional_decimal(&row, "real_value"), Ok(None));
    }

    #[tokio::test]
    async fn optional_reads_present_value() {
        let pool = setup_test_db().await;
        let row = fetch_probe_row(
            &pool,
            "INSERT INTO coercion_probe (id, real_value) VALUES (1, 999.99)",
            "SELECT real_value FROM coercion_probe WHERE id = 1",
        )
        .await;

        assert_eq!(
            get_optional_decimal(&row, "real_value"),
            Ok(Some(dec!(999.99)))
        );
    }

    #[tokio::test]
    async fn text_storage_is_rejected() {
        let pool = setup_test_db().await;
        let row = fetch_probe_row(
            &pool,
            "INSERT INTO coercion_probe (id, text_value) VALUES (1, 'not a number')",
            "SELECT text_value FROM coercion_probe WHERE id = 1",
        )
        .await;

        assert!(matches!(
            get_decimal(&row, "text_value"),
            Err(RepositoryError::Database(msg)) if msg.contains("unexpected type 'TEXT'")
        ));
    }

    #[tokio::test]
    async fn missing_column_is_reported() {
        let pool = setup_test_db().await;
        let row = fetch_probe_row(
            &pool,
            "INSERT INTO coercion_probe (id) VALUES (1)",
            "SELECT id FROM coercion_probe WHERE id = 1",
        )
        .await;

        assert!(matches!(
            get_decimal(&row, "no_such_column"),
            Err(RepositoryError::Database(msg)) if msg.contains("no_such_column")
        ));
    }

    #[test]
    fn decimal_to_f64_round_trips_cents() {
        assert_eq!(decimal_to_f64(dec!(123.45)), 123.45);
        assert_eq!(decimal_to_f64(dec!(-0.01)), -0.01);
        assert_eq!(decimal_to_f64(Decimal::ZERO), 0.0);
    }
}
