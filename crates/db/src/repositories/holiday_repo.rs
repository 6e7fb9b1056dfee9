//! Repository for the `holidays` table.

use hrsync_core::sync::HolidayPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::payroll::Holiday;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, date, is_recurring, created_at, updated_at";

/// Mirror operations for holidays.
pub struct HolidayRepo;

impl HolidayRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(pool: &PgPool, input: &HolidayPayload) -> Result<Holiday, sqlx::Error> {
        let query = format!(
            "INSERT INTO holidays (id, company_id, name, date, is_recurring)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                name = EXCLUDED.name,
                date = EXCLUDED.date,
                is_recurring = EXCLUDED.is_recurring,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Holiday>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(&input.name)
            .bind(input.date)
            .bind(input.is_recurring)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Holiday>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM holidays WHERE id = $1");
        sqlx::query_as::<_, Holiday>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM holidays WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
