//! Repository for the append-only `activity_logs` table.

use sqlx::PgPool;

use crate::models::activity::{ActivityLog, CreateActivityLog};

const COLUMNS: &str = "id, action, description, user_id, created_at";

/// Provides append and read operations for the activity log. There is no
/// update or delete.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append an entry, returning the stored row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (action, description, user_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(&input.action)
            .bind(&input.description)
            .bind(input.user_id)
            .fetch_one(pool)
            .await
    }

    /// Entries newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Entries with a given action code, newest first.
    ///
    /// Test support: the API reads the log through [`Self::list`].
    pub async fn list_by_action(
        pool: &PgPool,
        action: &str,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs WHERE action = $1 \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(action)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM activity_logs")
            .fetch_one(pool)
            .await
    }
}
