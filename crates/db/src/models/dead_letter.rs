//! Dead-letter models (table `sync_dead_letters`).

use hrsync_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `sync_dead_letters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeadLetter {
    pub id: DbId,
    pub topic: String,
    pub partition: i32,
    pub message_offset: i64,
    pub payload: String,
    pub error: String,
    pub attempts: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a new dead letter.
#[derive(Debug, Clone)]
pub struct CreateDeadLetter {
    pub topic: String,
    pub partition: i32,
    pub message_offset: i64,
    pub payload: String,
    pub error: String,
    pub attempts: i32,
}
