use std::sync::Arc;

use hrsync_events::{HandlerRegistry, MirrorStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything inside is behind `Arc` or is a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: hrsync_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Read access to mirrored records.
    pub store: Arc<dyn MirrorStore>,
    /// The same topic table the worker consumes with, used for replays.
    pub registry: Arc<HandlerRegistry>,
}

impl AppState {
    /// Wire the Postgres-backed store and the default registry onto `pool`.
    pub fn new(pool: hrsync_db::DbPool, config: ServerConfig) -> anyhow::Result<Self> {
        let store: Arc<dyn MirrorStore> =
            Arc::new(hrsync_events::PgMirrorStore::new(pool.clone()));
        let registry = hrsync_events::default_registry(Arc::clone(&store))?;
        Ok(Self {
            pool,
            config: Arc::new(config),
            store,
            registry: Arc::new(registry),
        })
    }
}
