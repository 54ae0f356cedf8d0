//! Repository for the `user_dataset_progress` table.

use annotate_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress_marker::ProgressMarker;

const COLUMNS: &str = "id, user_id, dataset_id, last_page, updated_at";

/// Remembers the last workspace page each annotator viewed per dataset.
pub struct ProgressMarkerRepo;

impl ProgressMarkerRepo {
    /// Find the marker for (user, dataset). Returns `None` if never saved.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        dataset_id: DbId,
    ) -> Result<Option<ProgressMarker>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_dataset_progress WHERE user_id = $1 AND dataset_id = $2"
        );
        sqlx::query_as::<_, ProgressMarker>(&query)
            .bind(user_id)
            .bind(dataset_id)
            .fetch_optional(pool)
            .await
    }

    /// Create or overwrite the marker for (user, dataset).
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        dataset_id: DbId,
        last_page: i64,
    ) -> Result<ProgressMarker, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_dataset_progress (user_id, dataset_id, last_page) \
             VALUES ($1, $2, $3) \
             ON CONFLICT (user_id, dataset_id) DO UPDATE \
             SET last_page = EXCLUDED.last_page \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressMarker>(&query)
            .bind(user_id)
            .bind(dataset_id)
            .bind(last_page)
            .fetch_one(pool)
            .await
    }
}
