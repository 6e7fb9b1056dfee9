//! Repository for the `overtimes` table.

use hrsync_core::sync::OvertimePayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::payroll::Overtime;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, description, is_active, created_at, updated_at";

/// Mirror operations for overtimes.
pub struct OvertimeRepo;

impl OvertimeRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(pool: &PgPool, input: &OvertimePayload) -> Result<Overtime, sqlx::Error> {
        let query = format!(
            "INSERT INTO overtimes (id, company_id, name, description, is_active)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Overtime>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Overtime>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM overtimes WHERE id = $1");
        sqlx::query_as::<_, Overtime>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM overtimes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
