use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A delete was blocked because another mirrored row still references it.
    #[error("Record in use: {entity} with id {id} is still referenced")]
    RecordInUse { entity: &'static str, id: DbId },

    /// An upsert referenced a parent row that is not mirrored (yet).
    #[error("Missing reference for {entity} with id {id}: {detail}")]
    MissingReference {
        entity: &'static str,
        id: DbId,
        detail: String,
    },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
