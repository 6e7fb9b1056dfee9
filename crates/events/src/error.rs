use hrsync_core::error::CoreError;
use hrsync_db::sqlstate;

/// Errors raised while applying an upstream event to the mirror.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A domain-level error (not found, record in use, missing reference).
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The payload decoded but does not describe a valid record.
    #[error("Invalid payload on {topic}: {reason}")]
    InvalidPayload { topic: String, reason: String },

    #[error("Malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Broker error: {0}")]
    Broker(#[from] rdkafka::error::KafkaError),
}

impl SyncError {
    /// Whether applying the same event again may succeed.
    ///
    /// Connection-level database failures are transient. A missing reference
    /// is retried because the parent row may still be in flight on another
    /// topic.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Database(e) => sqlstate::is_transient(e),
            SyncError::Core(CoreError::MissingReference { .. }) => true,
            _ => false,
        }
    }
}
