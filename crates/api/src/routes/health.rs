//! Liveness for the mirror: database reachability, the topics the registry
//! routes and how many events are parked awaiting replay.

use axum::extract::State;
use axum::{routing::get, Json, Router};
use hrsync_db::repositories::DeadLetterRepo;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok`, or `degraded` when PostgreSQL is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Topics with a registered handler.
    pub topics: usize,
    /// Parked events. Absent when the database is down.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dead_letters: Option<i64>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = hrsync_db::health_check(&state.pool).await.is_ok();
    let dead_letters = if db_healthy {
        DeadLetterRepo::count(&state.pool)
            .await
            .inspect_err(|e| tracing::warn!(error = %e, "Failed to count dead letters"))
            .ok()
    } else {
        None
    };

    Json(HealthResponse {
        status: if db_healthy { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        topics: state.registry.topics().len(),
        dead_letters,
    })
}

/// Served at the root, outside `/api/v1`, so probes skip the API prefix.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
