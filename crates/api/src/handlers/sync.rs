//! Handlers for the `/sync` resource: the consumed topic list and dead-letter
//! management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hrsync_core::error::CoreError;
use hrsync_core::pagination::{clamp_limit, clamp_offset, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use hrsync_core::types::{DbId, Timestamp};
use hrsync_db::models::dead_letter::DeadLetter;
use hrsync_db::repositories::DeadLetterRepo;
use hrsync_events::{Dispatch, HandlerOutcome, SyncError};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::query::{PaginationParams, ReplayParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of replaying one dead letter.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReplayResult {
    /// The event was applied and the letter removed.
    Applied { outcome: HandlerOutcome },
    /// The topic is no longer consumed; the letter was removed.
    Ignored,
    /// Applying failed again; the letter was kept with the new error.
    Failed { error: String, dead_letter: DeadLetter },
}

/// GET /api/v1/sync/topics
pub async fn list_topics(State(state): State<AppState>) -> impl IntoResponse {
    Json(DataResponse {
        data: state.registry.topics(),
    })
}

/// GET /api/v1/sync/dead-letters
///
/// Newest first. `?limit=` defaults to 50, capped at 500.
pub async fn list_dead_letters(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT);
    let offset = clamp_offset(params.offset);
    let letters = DeadLetterRepo::list(&state.pool, limit, offset).await?;

    Ok(Json(DataResponse { data: letters }))
}

/// POST /api/v1/sync/dead-letters/{id}/replay
///
/// Re-dispatch the stored payload through the registry. Replays are applied
/// once with no retry loop and outside the consumer's per-record lanes, so a
/// replay could land after newer events for the same record. It is refused
/// with 409 `STALE_REPLAY` when the mirrored record was written after the
/// letter was recorded; `?force=true` applies it anyway.
pub async fn replay_dead_letter(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<ReplayParams>,
) -> AppResult<impl IntoResponse> {
    let letter = DeadLetterRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "DeadLetter",
            id,
        })?;

    if !params.force {
        if let Some(updated_at) = superseded_at(&state, &letter).await? {
            return Err(AppError::StaleReplay(format!(
                "Record was updated at {updated_at}, after dead letter {id} was recorded at {}",
                letter.created_at,
            )));
        }
    }

    let applied = match serde_json::from_str::<serde_json::Value>(&letter.payload) {
        Ok(value) => state.registry.dispatch(&letter.topic, value).await,
        Err(e) => Err(SyncError::from(e)),
    };

    let result = match applied {
        Ok(dispatch) => {
            DeadLetterRepo::delete(&state.pool, id).await?;
            tracing::info!(dead_letter_id = id, topic = %letter.topic, "Dead letter replayed");
            match dispatch {
                Dispatch::Handled(outcome) => ReplayResult::Applied { outcome },
                Dispatch::Ignored => ReplayResult::Ignored,
            }
        }
        Err(e) => {
            let error = e.to_string();
            tracing::warn!(dead_letter_id = id, topic = %letter.topic, %error, "Replay failed");
            let dead_letter = DeadLetterRepo::record_failure(&state.pool, id, &error)
                .await?
                .ok_or(CoreError::NotFound {
                    entity: "DeadLetter",
                    id,
                })?;
            ReplayResult::Failed { error, dead_letter }
        }
    };

    Ok(Json(DataResponse { data: result }))
}

/// When the letter's record has been written since the letter was recorded,
/// the time of that write.
async fn superseded_at(state: &AppState, letter: &DeadLetter) -> AppResult<Option<Timestamp>> {
    let Some(topic) = state.registry.route(&letter.topic) else {
        return Ok(None);
    };
    let Some(record_id) = serde_json::from_str::<serde_json::Value>(&letter.payload)
        .ok()
        .and_then(|value| value.get("id").and_then(serde_json::Value::as_i64))
    else {
        return Ok(None);
    };

    let record = match state.store.fetch(topic.entity, record_id).await {
        Ok(record) => record,
        Err(SyncError::Core(CoreError::NotFound { .. })) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let updated_at = record
        .get("updatedAt")
        .cloned()
        .and_then(|at| serde_json::from_value::<Timestamp>(at).ok());
    Ok(updated_at.filter(|at| *at > letter.created_at))
}

/// DELETE /api/v1/sync/dead-letters/{id}
pub async fn delete_dead_letter(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if DeadLetterRepo::delete(&state.pool, id).await? {
        tracing::info!(dead_letter_id = id, "Dead letter discarded");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "DeadLetter",
            id,
        }))
    }
}
