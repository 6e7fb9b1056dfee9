pub mod health;
pub mod mirror;
pub mod sync;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /mirror/{entity}/{id}                 mirrored record
/// /sync/topics                          consumed topics
/// /sync/dead-letters                    list
/// /sync/dead-letters/{id}               discard
/// /sync/dead-letters/{id}/replay        re-dispatch
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/mirror", mirror::router())
        .nest("/sync", sync::router())
}
