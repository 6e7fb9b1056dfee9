use serde::Deserialize;

/// Generic pagination parameters (`?limit=&offset=`).
///
/// Clamped in the handler via `clamp_limit` / `clamp_offset`.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// `?force=` for dead-letter replay.
#[derive(Debug, Default, Deserialize)]
pub struct ReplayParams {
    /// Replay even when the mirrored record changed after the letter was
    /// recorded.
    #[serde(default)]
    pub force: bool,
}
