//! Route definitions for the `/sync` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::sync;
use crate::state::AppState;

/// Routes mounted at `/sync`.
///
/// ```text
/// GET    /topics                       -> list_topics
/// GET    /dead-letters                 -> list_dead_letters (?limit=&offset=)
/// DELETE /dead-letters/{id}            -> delete_dead_letter
/// POST   /dead-letters/{id}/replay     -> replay_dead_letter (?force=)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/topics", get(sync::list_topics))
        .route("/dead-letters", get(sync::list_dead_letters))
        .route("/dead-letters/{id}", delete(sync::delete_dead_letter))
        .route("/dead-letters/{id}/replay", post(sync::replay_dead_letter))
}
