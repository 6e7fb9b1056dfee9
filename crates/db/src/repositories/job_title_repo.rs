//! Repository for the `job_titles` table.

use hrsync_core::sync::JobTitlePayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::JobTitle;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, code, name, description, created_at, updated_at";

/// Mirror operations for job titles.
pub struct JobTitleRepo;

impl JobTitleRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(pool: &PgPool, input: &JobTitlePayload) -> Result<JobTitle, sqlx::Error> {
        let query = format!(
            "INSERT INTO job_titles (id, company_id, code, name, description)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                code = EXCLUDED.code,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, JobTitle>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<JobTitle>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM job_titles WHERE id = $1");
        sqlx::query_as::<_, JobTitle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM job_titles WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
