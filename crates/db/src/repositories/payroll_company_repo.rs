//! Repository for the `payroll_companies` table.

use hrsync_core::sync::PayrollCompanyPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::PayrollCompany;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, email, country_code, is_active, created_at, updated_at";

/// Mirror operations for payroll companies.
pub struct PayrollCompanyRepo;

impl PayrollCompanyRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &PayrollCompanyPayload,
    ) -> Result<PayrollCompany, sqlx::Error> {
        let query = format!(
            "INSERT INTO payroll_companies (id, name, email, country_code, is_active)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                country_code = EXCLUDED.country_code,
                is_active = EXCLUDED.is_active,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PayrollCompany>(&query)
            .bind(input.id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.country_code)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PayrollCompany>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payroll_companies WHERE id = $1");
        sqlx::query_as::<_, PayrollCompany>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM payroll_companies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
