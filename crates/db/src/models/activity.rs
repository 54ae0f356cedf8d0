//! Activity log model (`activity_logs`, append-only).

use annotate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub action: String,
    pub description: String,
    pub user_id: Option<DbId>,
    pub created_at: Timestamp,
}

/// DTO for appending an activity entry.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub action: String,
    pub description: String,
    pub user_id: Option<DbId>,
}
