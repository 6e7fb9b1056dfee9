//! Repository for the `grade_levels` table.

use hrsync_core::sync::GradeLevelPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::GradeLevel;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, company_id, company_level_id, code, name, description, \
    created_at, updated_at";

/// Mirror operations for grade levels.
pub struct GradeLevelRepo;

impl GradeLevelRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &GradeLevelPayload,
    ) -> Result<GradeLevel, sqlx::Error> {
        let query = format!(
            "INSERT INTO grade_levels (id, company_id, company_level_id, code, name, description)
             VALUES ($1, $2, $3, $4, $5, $6)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                company_level_id = EXCLUDED.company_level_id,
                code = EXCLUDED.code,
                name = EXCLUDED.name,
                description = EXCLUDED.description,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, GradeLevel>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(input.company_level_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<GradeLevel>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM grade_levels WHERE id = $1");
        sqlx::query_as::<_, GradeLevel>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM grade_levels WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
