//! Repository for the `department_leaderships` table.
//!
//! A leadership row pins an employee to a department at a given rank; it
//! blocks deletion of both while it exists.

use hrsync_core::sync::DepartmentLeadershipPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::DepartmentLeadership;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, department_id, employee_id, rank, created_at, updated_at";

/// Mirror operations for department leaderships.
pub struct DepartmentLeadershipRepo;

impl DepartmentLeadershipRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &DepartmentLeadershipPayload,
    ) -> Result<DepartmentLeadership, sqlx::Error> {
        let query = format!(
            "INSERT INTO department_leaderships (id, department_id, employee_id, rank)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                department_id = EXCLUDED.department_id,
                employee_id = EXCLUDED.employee_id,
                rank = EXCLUDED.rank,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DepartmentLeadership>(&query)
            .bind(input.id)
            .bind(input.department_id)
            .bind(input.employee_id)
            .bind(input.rank)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DepartmentLeadership>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM department_leaderships WHERE id = $1");
        sqlx::query_as::<_, DepartmentLeadership>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM department_leaderships WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
