use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use hrsync_core::error::CoreError;
use hrsync_db::sqlstate;
use hrsync_events::SyncError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and [`SyncError`] for domain errors and adds
/// HTTP-specific variants. Implements [`IntoResponse`] to produce consistent
/// JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An error raised while applying an event through the registry.
    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A replay would overwrite a newer mirrored record.
    #[error("Stale replay: {0}")]
    StaleReplay(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

type Classified = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::Sync(err) => classify_sync_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::StaleReplay(msg) => (StatusCode::CONFLICT, "STALE_REPLAY", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn internal() -> Classified {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn classify_core_error(err: &CoreError) -> Classified {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::RecordInUse { .. } => {
            (StatusCode::CONFLICT, "RECORD_IN_USE", err.to_string())
        }
        CoreError::MissingReference { .. } => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "MISSING_REFERENCE",
            err.to_string(),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

fn classify_sync_error(err: &SyncError) -> Classified {
    match err {
        SyncError::Core(core) => classify_core_error(core),
        SyncError::Database(db) => classify_sqlx_error(db),
        SyncError::InvalidPayload { .. } => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", err.to_string())
        }
        SyncError::Json(_) => (StatusCode::BAD_REQUEST, "MALFORMED_PAYLOAD", err.to_string()),
        SyncError::Broker(e) => {
            tracing::error!(error = %e, "Broker error");
            internal()
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Foreign key violations map to 409 `RECORD_IN_USE`.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }
    if sqlstate::is_unique_violation(err) {
        let constraint = sqlstate::constraint(err).unwrap_or("unknown");
        if constraint.starts_with("uq_") {
            return (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            );
        }
    }
    if sqlstate::is_foreign_key_violation(err) {
        let constraint = sqlstate::constraint(err).unwrap_or("unknown");
        return (
            StatusCode::CONFLICT,
            "RECORD_IN_USE",
            format!("Foreign key constraint violated: {constraint}"),
        );
    }
    tracing::error!(error = %err, "Database error");
    internal()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn record_in_use_is_conflict() {
        let err = AppError::Core(CoreError::RecordInUse {
            entity: "Department",
            id: 42,
        });
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn sync_errors_unwrap_to_their_domain_status() {
        let missing = SyncError::from(CoreError::MissingReference {
            entity: "Employee",
            id: 7,
            detail: "fk_employees_department".into(),
        });
        assert_eq!(status_of(missing.into()), StatusCode::UNPROCESSABLE_ENTITY);

        let invalid = SyncError::InvalidPayload {
            topic: "event.Company.created".into(),
            reason: "missing field `name`".into(),
        };
        assert_eq!(status_of(invalid.into()), StatusCode::BAD_REQUEST);

        let not_found = SyncError::from(CoreError::NotFound { entity: "Company", id: 1 });
        assert_eq!(status_of(not_found.into()), StatusCode::NOT_FOUND);
    }

    #[test]
    fn stale_replay_is_conflict() {
        let err = AppError::StaleReplay("Department 42 changed".into());
        assert_eq!(status_of(err), StatusCode::CONFLICT);
    }

    #[test]
    fn pool_timeout_is_internal() {
        let err = AppError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(status_of(err), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
