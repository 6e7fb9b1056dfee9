//! Read access to mirrored records.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use hrsync_core::topic::EntityKind;
use hrsync_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/mirror/{entity}/{id}
///
/// `entity` is either the kebab-case slug (`department-leadership`) or the
/// name used in topics (`DepartmentLeadership`).
pub async fn get_record(
    State(state): State<AppState>,
    Path((entity, id)): Path<(String, DbId)>,
) -> AppResult<impl IntoResponse> {
    let kind: EntityKind = entity
        .parse()
        .map_err(|e: hrsync_core::topic::UnknownEntity| AppError::BadRequest(e.to_string()))?;
    let record = state.store.fetch(kind, id).await?;

    Ok(Json(DataResponse { data: record }))
}
