//! Repository for the `pay_periods` table.

use hrsync_core::sync::PayPeriodPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::payroll::PayPeriod;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, company_id, code, name, start_date, end_date, pay_date, \
    created_at, updated_at";

/// Mirror operations for pay periods.
pub struct PayPeriodRepo;

impl PayPeriodRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(pool: &PgPool, input: &PayPeriodPayload) -> Result<PayPeriod, sqlx::Error> {
        let query = format!(
            "INSERT INTO pay_periods (id, company_id, code, name, start_date, end_date, pay_date)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                code = EXCLUDED.code,
                name = EXCLUDED.name,
                start_date = EXCLUDED.start_date,
                end_date = EXCLUDED.end_date,
                pay_date = EXCLUDED.pay_date,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PayPeriod>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.pay_date)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<PayPeriod>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM pay_periods WHERE id = $1");
        sqlx::query_as::<_, PayPeriod>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM pay_periods WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
