//! Repository for the `departments` table.

use hrsync_core::sync::DepartmentPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::Department;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, company_id, code, name, parent_id, created_at, updated_at";

/// Mirror operations for departments.
pub struct DepartmentRepo;

impl DepartmentRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &DepartmentPayload,
    ) -> Result<Department, sqlx::Error> {
        let query = format!(
            "INSERT INTO departments (id, company_id, code, name, parent_id)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                code = EXCLUDED.code,
                name = EXCLUDED.name,
                parent_id = EXCLUDED.parent_id,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Department>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(input.parent_id)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Department>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM departments WHERE id = $1");
        sqlx::query_as::<_, Department>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while employees, leadership rows or
    /// child departments still point at the department.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM departments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
