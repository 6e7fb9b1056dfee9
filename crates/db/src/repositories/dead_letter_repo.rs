//! Repository for the `sync_dead_letters` table.

use hrsync_core::types::DbId;
use sqlx::PgPool;

use crate::models::dead_letter::{CreateDeadLetter, DeadLetter};

const COLUMNS: &str = "\
    id, topic, partition, message_offset, payload, error, attempts, \
    created_at, updated_at";

/// Provides CRUD operations for dead letters.
pub struct DeadLetterRepo;

impl DeadLetterRepo {
    /// Insert a new dead letter, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateDeadLetter,
    ) -> Result<DeadLetter, sqlx::Error> {
        let query = format!(
            "INSERT INTO sync_dead_letters
                (topic, partition, message_offset, payload, error, attempts)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeadLetter>(&query)
            .bind(&input.topic)
            .bind(input.partition)
            .bind(input.message_offset)
            .bind(&input.payload)
            .bind(&input.error)
            .bind(input.attempts)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DeadLetter>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sync_dead_letters WHERE id = $1");
        sqlx::query_as::<_, DeadLetter>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List dead letters newest-first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DeadLetter>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sync_dead_letters
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, DeadLetter>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Record a failed replay: bump `attempts` and store the latest error.
    pub async fn record_failure(
        pool: &PgPool,
        id: DbId,
        error: &str,
    ) -> Result<Option<DeadLetter>, sqlx::Error> {
        let query = format!(
            "UPDATE sync_dead_letters
             SET attempts = attempts + 1, error = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DeadLetter>(&query)
            .bind(id)
            .bind(error)
            .fetch_optional(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM sync_dead_letters")
            .fetch_one(pool)
            .await
    }

    /// Delete a dead letter. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sync_dead_letters WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
