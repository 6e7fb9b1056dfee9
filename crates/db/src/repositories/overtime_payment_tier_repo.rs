//! Repository for the `overtime_payment_tiers` table.

use hrsync_core::sync::OvertimePaymentTierPayload;
use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::payroll::OvertimePaymentTier;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "\
    id, overtime_id, min_hours, max_hours, multiplier, \
    created_at, updated_at";

/// Mirror operations for overtime payment tiers.
pub struct OvertimePaymentTierRepo;

impl OvertimePaymentTierRepo {
    /// Insert the row, or overwrite every mirrored column if the id already exists.
    pub async fn upsert(
        pool: &PgPool,
        input: &OvertimePaymentTierPayload,
    ) -> Result<OvertimePaymentTier, sqlx::Error> {
        let query = format!(
            "INSERT INTO overtime_payment_tiers (id, overtime_id, min_hours, max_hours, multiplier)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (id) DO UPDATE SET
                overtime_id = EXCLUDED.overtime_id,
                min_hours = EXCLUDED.min_hours,
                max_hours = EXCLUDED.max_hours,
                multiplier = EXCLUDED.multiplier,
                updated_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OvertimePaymentTier>(&query)
            .bind(input.id)
            .bind(input.overtime_id)
            .bind(input.min_hours)
            .bind(input.max_hours)
            .bind(input.multiplier)
            .fetch_one(pool)
            .await
    }

    /// Find a mirrored row by its upstream id.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<OvertimePaymentTier>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM overtime_payment_tiers WHERE id = $1");
        sqlx::query_as::<_, OvertimePaymentTier>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete by id. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM overtime_payment_tiers WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
