//! Repository for the `company_currency_configs` table.

use hrsync_core::sync::CompanyCurrencyConfigPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::payroll::CompanyCurrencyConfig;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, company_id, currency_id, exchange_rate, is_default, \
    created_at, updated_at";

/// Mirror operations for company currency configs.
pub struct CompanyCurrencyConfigRepo;

impl CompanyCurrencyConfigRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &CompanyCurrencyConfigPayload,
    ) -> Result<CompanyCurrencyConfig, sqlx::Error> {
        let query = format!(
            "INSERT INTO company_currency_configs (id, company_id, currency_id, exchange_rate, is_default)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                company_id = EXCLUDED.company_id,
                currency_id = EXCLUDED.currency_id,
                exchange_rate = EXCLUDED.exchange_rate,
                is_default = EXCLUDED.is_default,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CompanyCurrencyConfig>(&query)
            .bind(input.id)
            .bind(input.company_id)
            .bind(input.currency_id)
            .bind(input.exchange_rate)
            .bind(input.is_default)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CompanyCurrencyConfig>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM company_currency_configs WHERE id = $1");
        sqlx::query_as::<_, CompanyCurrencyConfig>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM company_currency_configs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
