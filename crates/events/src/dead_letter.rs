//! Parking place for messages that could not be applied.
//!
//! A message is dead-lettered when its payload is malformed or invalid, when
//! applying it fails with a non-retryable error, or when retries run out. The
//! stored letter keeps the raw payload so it can be replayed later.

use async_trait::async_trait;
use hrsync_db::models::dead_letter::CreateDeadLetter;
use hrsync_db::repositories::DeadLetterRepo;
use hrsync_db::DbPool;
use tokio::sync::Mutex;

use crate::error::SyncError;

/// One message that could not be applied.
#[derive(Debug, Clone, PartialEq)]
pub struct DeadLetter {
    pub topic: String,
    pub partition: i32,
    pub offset: i64,
    /// Raw message value, lossily decoded as UTF-8.
    pub payload: String,
    pub error: String,
    pub attempts: u32,
}

#[async_trait]
pub trait DeadLetterSink: Send + Sync {
    async fn record(&self, letter: DeadLetter) -> Result<(), SyncError>;
}

// ---------------------------------------------------------------------------
// PostgreSQL
// ---------------------------------------------------------------------------

/// Writes dead letters to `sync_dead_letters`.
#[derive(Clone)]
pub struct PgDeadLetterSink {
    pool: DbPool,
}

impl PgDeadLetterSink {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DeadLetterSink for PgDeadLetterSink {
    async fn record(&self, letter: DeadLetter) -> Result<(), SyncError> {
        let input = CreateDeadLetter {
            topic: letter.topic,
            partition: letter.partition,
            message_offset: letter.offset,
            payload: letter.payload,
            error: letter.error,
            attempts: i32::try_from(letter.attempts).unwrap_or(i32::MAX),
        };
        let row = DeadLetterRepo::create(&self.pool, &input).await?;
        tracing::info!(
            dead_letter_id = row.id,
            topic = %row.topic,
            partition = row.partition,
            offset = row.message_offset,
            "Dead letter recorded"
        );
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// In-memory
// ---------------------------------------------------------------------------

/// Collects dead letters in memory.
#[derive(Default)]
pub struct MemoryDeadLetters {
    letters: Mutex<Vec<DeadLetter>>,
}

impl MemoryDeadLetters {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn letters(&self) -> Vec<DeadLetter> {
        self.letters.lock().await.clone()
    }
}

#[async_trait]
impl DeadLetterSink for MemoryDeadLetters {
    async fn record(&self, letter: DeadLetter) -> Result<(), SyncError> {
        self.letters.lock().await.push(letter);
        Ok(())
    }
}
