use std::sync::Arc;

use crate::auth::denylist::TokenDenylist;
use crate::config::ServerConfig;
use crate::engine::activity::ActivityRecorder;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: annotate_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Revoked token ids, checked on every authenticated request.
    pub denylist: Arc<TokenDenylist>,
    /// Audit trail writer shared by every engine.
    pub activity: ActivityRecorder,
}

impl AppState {
    pub fn new(pool: annotate_db::DbPool, config: ServerConfig) -> Self {
        Self {
            activity: ActivityRecorder::new(pool.clone()),
            pool,
            config: Arc::new(config),
            denylist: Arc::new(TokenDenylist::new()),
        }
    }
}
