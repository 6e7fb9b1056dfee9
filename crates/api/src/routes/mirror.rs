//! Route definitions for the `/mirror` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::mirror;
use crate::state::AppState;

/// Routes mounted at `/mirror`.
///
/// ```text
/// GET    /{entity}/{id}     -> get_record
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{entity}/{id}", get(mirror::get_record))
}
