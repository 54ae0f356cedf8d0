//! Last viewed page per (annotator, dataset).

use annotate_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `user_dataset_progress` table.
#[derive(Debug, Clone, FromRow)]
pub struct ProgressMarker {
    pub id: DbId,
    pub user_id: DbId,
    pub dataset_id: DbId,
    pub last_page: i64,
    pub updated_at: Timestamp,
}
