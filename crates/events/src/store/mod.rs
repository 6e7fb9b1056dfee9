//! The seam between event handlers and persistence.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use hrsync_core::sync::SyncRecord;
use hrsync_core::topic::EntityKind;
use hrsync_core::types::DbId;

use crate::error::SyncError;

pub use memory::MemoryStore;
pub use postgres::PgMirrorStore;

/// Create-or-update and delete operations on mirrored records.
///
/// Implementations must enforce referential integrity the way the database
/// does: an upsert naming a missing parent fails with
/// [`CoreError::MissingReference`](hrsync_core::error::CoreError::MissingReference),
/// and deleting a row that is still referenced fails with
/// [`CoreError::RecordInUse`](hrsync_core::error::CoreError::RecordInUse)
/// and leaves the row in place.
#[async_trait]
pub trait MirrorStore: Send + Sync {
    /// Insert or overwrite the record keyed on its upstream id.
    ///
    /// Returns the persisted record as JSON.
    async fn upsert(&self, record: &SyncRecord) -> Result<serde_json::Value, SyncError>;

    /// Delete by id. Fails with `NotFound` when no such row exists.
    async fn delete(&self, kind: EntityKind, id: DbId) -> Result<(), SyncError>;

    /// Fetch the stored record as JSON. Fails with `NotFound` when absent.
    async fn fetch(&self, kind: EntityKind, id: DbId) -> Result<serde_json::Value, SyncError>;
}
