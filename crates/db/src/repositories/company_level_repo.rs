//! Repository for the `company_levels` table.

use hrsync_core::sync::CompanyLevelPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::CompanyLevel;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, name, level, created_at, updated_at";

/// Mirror operations for company levels.
pub struct CompanyLevelRepo;

impl CompanyLevelRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &CompanyLevelPayload,
    ) -> Result<CompanyLevel, sqlx::Error> {
        let query = format!(
            "INSERT INTO company_levels (id, company_id, name, level)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                name = EXCLUDED.name,
                level = EXCLUDED.level,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompanyLevel>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(&input.name)
            .bind(input.level)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CompanyLevel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM company_levels WHERE id = $1");
        sqlx::query_as::<_, CompanyLevel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM company_levels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
