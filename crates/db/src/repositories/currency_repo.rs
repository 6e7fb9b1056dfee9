//! Repository for the `currencies` table.

use hrsync_core::sync::CurrencyPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::payroll::Currency;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, code, name, symbol, created_at, updated_at";

/// Mirror operations for currencies.
///
/// Currencies are shared across companies and referenced by company currency
/// configs and employee pay infos.
pub struct CurrencyRepo;

impl CurrencyRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(pool: &PgPool, input: &CurrencyPayload) -> Result<Currency, sqlx::Error> {
        let query = format!(
            "INSERT INTO currencies (id, code, name, symbol)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT (id) DO UPDATE SET
                code = EXCLUDED.code,
                name = EXCLUDED.name,
                symbol = EXCLUDED.symbol,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Currency>(&query)
            .bind(input.id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.symbol)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Currency>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM currencies WHERE id = $1");
        sqlx::query_as::<_, Currency>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    ///
    /// Currencies are never deleted upstream; there is no delete topic.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM currencies WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
