//! Audit trail writer shared by every engine.

use annotate_core::types::DbId;
use annotate_db::models::activity::CreateActivityLog;
use annotate_db::repositories::ActivityLogRepo;
use sqlx::PgPool;

/// Appends entries to `activity_logs`.
///
/// Recording never fails the caller: a failed insert is logged and dropped,
/// so a broken audit table cannot turn a successful operation into an error.
#[derive(Clone)]
pub struct ActivityRecorder {
    pool: PgPool,
}

impl ActivityRecorder {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn record(
        &self,
        action: &str,
        description: impl Into<String>,
        user_id: Option<DbId>,
    ) {
        let input = CreateActivityLog {
            action: action.to_string(),
            description: description.into(),
            user_id,
        };
        if let Err(e) = ActivityLogRepo::create(&self.pool, &input).await {
            tracing::error!(action, error = %e, "Failed to record activity");
        }
    }

    /// Record a failed operation as `"{context}: {error}"`.
    ///
    /// Called after the operation's transaction has been rolled back, so the
    /// entry survives the failure it describes.
    pub async fn record_failure(
        &self,
        action: &str,
        context: &str,
        error: &impl std::fmt::Display,
        user_id: Option<DbId>,
    ) {
        tracing::warn!(action, error = %error, "{context}");
        self.record(action, format!("{context}: {error}"), user_id).await;
    }
}
