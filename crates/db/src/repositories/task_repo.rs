//! Repository for the `tasks` table.

use annotate_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::dataset::DatasetTaskTotals;
use crate::models::status::TaskStatus;
use crate::models::task::{
    AnnotatorDatasetTasks, AnnotatorTaskRow, AnnotatorTaskTotals, DatasetStatusCounts, NewTask,
    Task,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dataset_id, user_id, text_pair_id, status_id, created_at, \
                       started_at, deadline_at, completed_at";

/// Provides task lifecycle operations and task-based aggregates.
pub struct TaskRepo;

impl TaskRepo {
    /// Bulk insert pending tasks for one assignment run.
    pub async fn create_batch(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        dataset_id: DbId,
        tasks: &[NewTask],
        deadline_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        if tasks.is_empty() {
            return Ok(0);
        }
        let user_ids: Vec<DbId> = tasks.iter().map(|t| t.user_id).collect();
        let pair_ids: Vec<DbId> = tasks.iter().map(|t| t.text_pair_id).collect();
        let result = sqlx::query(
            "INSERT INTO tasks (dataset_id, user_id, text_pair_id, status_id, deadline_at) \
             SELECT $1, u, p, $4, $5 FROM UNNEST($2::bigint[], $3::bigint[]) AS x(u, p)",
        )
        .bind(dataset_id)
        .bind(&user_ids)
        .bind(&pair_ids)
        .bind(TaskStatus::Pending.id())
        .bind(deadline_at)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a task by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every task of one annotator in one dataset, ordered by ID.
    ///
    /// Test support: engines lock these rows with [`Self::lock_for_annotator`].
    pub async fn list_for_annotator(
        pool: &PgPool,
        dataset_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE dataset_id = $1 AND user_id = $2 ORDER BY id"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(dataset_id)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Lock and return every task of one annotator in one dataset.
    pub async fn lock_for_annotator(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        dataset_id: DbId,
        user_id: DbId,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks WHERE dataset_id = $1 AND user_id = $2 \
             ORDER BY id FOR UPDATE"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(dataset_id)
            .bind(user_id)
            .fetch_all(&mut **tx)
            .await
    }

    /// Detach tasks from their annotator and reset them to pending.
    pub async fn release(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET user_id = NULL, status_id = $2, deadline_at = NULL \
             WHERE id = ANY($1)",
        )
        .bind(ids)
        .bind(TaskStatus::Pending.id())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Mark the annotator's task for a pair as done. Returns the number of
    /// rows updated, which is zero when no such task exists.
    pub async fn complete_for_pair(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        text_pair_id: DbId,
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET status_id = $3, completed_at = NOW() \
             WHERE text_pair_id = $1 AND user_id = $2",
        )
        .bind(text_pair_id)
        .bind(user_id)
        .bind(TaskStatus::Done.id())
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Total and completed task counts for one dataset.
    pub async fn totals_for_dataset(
        pool: &PgPool,
        dataset_id: DbId,
    ) -> Result<DatasetTaskTotals, sqlx::Error> {
        sqlx::query_as::<_, DatasetTaskTotals>(
            "SELECT $1::bigint AS dataset_id,
                    COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status_id = $2) AS completed
             FROM tasks
             WHERE dataset_id = $1",
        )
        .bind(dataset_id)
        .bind(TaskStatus::Done.id())
        .fetch_one(pool)
        .await
    }

    /// Total and completed tasks across all datasets, optionally restricted to
    /// tasks created before `before`.
    pub async fn global_totals(
        pool: &PgPool,
        before: Option<Timestamp>,
    ) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status_id = $1)
             FROM tasks
             WHERE $2::timestamptz IS NULL OR created_at < $2",
        )
        .bind(TaskStatus::Done.id())
        .bind(before)
        .fetch_one(pool)
        .await
    }

    /// Number of tasks one annotator holds in one dataset.
    pub async fn count_for_annotator(
        pool: &PgPool,
        dataset_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM tasks WHERE dataset_id = $1 AND user_id = $2",
        )
        .bind(dataset_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// The annotator's task at `offset` (ordered by task ID) with its pair and
    /// the class the annotator chose, if any.
    pub async fn find_annotator_task_at(
        pool: &PgPool,
        dataset_id: DbId,
        user_id: DbId,
        offset: i64,
    ) -> Result<Option<AnnotatorTaskRow>, sqlx::Error> {
        sqlx::query_as::<_, AnnotatorTaskRow>(
            "SELECT t.id AS task_id, t.status_id, t.created_at, t.deadline_at, t.completed_at,
                    tp.id AS text_pair_id, tp.text1, tp.text2,
                    c.name AS class_name
             FROM tasks t
             JOIN text_pairs tp ON tp.id = t.text_pair_id
             LEFT JOIN annotations a ON a.text_pair_id = t.text_pair_id AND a.user_id = t.user_id
             LEFT JOIN dataset_classes c ON c.id = a.class_id
             WHERE t.dataset_id = $1 AND t.user_id = $2
             ORDER BY t.id
             LIMIT 1 OFFSET $3",
        )
        .bind(dataset_id)
        .bind(user_id)
        .bind(offset)
        .fetch_optional(pool)
        .await
    }

    /// Per-dataset overview of one annotator's tasks.
    pub async fn summarize_for_annotator(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<AnnotatorDatasetTasks>, sqlx::Error> {
        sqlx::query_as::<_, AnnotatorDatasetTasks>(
            "SELECT d.id AS dataset_id, d.name AS dataset_name, d.description,
                    ARRAY_AGG(t.id ORDER BY t.id) AS task_ids,
                    COUNT(DISTINCT t.text_pair_id) AS text_pair_count,
                    COUNT(DISTINCT a.text_pair_id) AS annotated_count
             FROM tasks t
             JOIN datasets d ON d.id = t.dataset_id
             LEFT JOIN annotations a ON a.text_pair_id = t.text_pair_id AND a.user_id = t.user_id
             WHERE t.user_id = $1
             GROUP BY d.id, d.name, d.description
             ORDER BY d.id",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Completed and open (pending or in progress) task counts per dataset.
    /// Datasets without tasks are included with zero counts.
    pub async fn status_counts_by_dataset(
        pool: &PgPool,
    ) -> Result<Vec<DatasetStatusCounts>, sqlx::Error> {
        sqlx::query_as::<_, DatasetStatusCounts>(
            "SELECT d.id AS dataset_id, d.name AS dataset_name,
                    COUNT(t.id) FILTER (WHERE t.status_id = $1) AS completed,
                    COUNT(t.id) FILTER (WHERE t.status_id IN ($2, $3)) AS pending
             FROM datasets d
             LEFT JOIN tasks t ON t.dataset_id = d.id
             GROUP BY d.id, d.name
             ORDER BY d.id",
        )
        .bind(TaskStatus::Done.id())
        .bind(TaskStatus::Pending.id())
        .bind(TaskStatus::InProgress.id())
        .fetch_all(pool)
        .await
    }

    /// Total and completed task counts for every annotator, ordered by user ID.
    pub async fn totals_by_annotator(
        pool: &PgPool,
        annotator_role_id: DbId,
    ) -> Result<Vec<AnnotatorTaskTotals>, sqlx::Error> {
        sqlx::query_as::<_, AnnotatorTaskTotals>(
            "SELECT u.id AS user_id, u.first_name, u.last_name,
                    COUNT(t.id) AS total,
                    COUNT(t.id) FILTER (WHERE t.status_id = $2) AS completed
             FROM users u
             LEFT JOIN tasks t ON t.user_id = u.id
             WHERE u.role_id = $1
             GROUP BY u.id, u.first_name, u.last_name
             ORDER BY u.id",
        )
        .bind(annotator_role_id)
        .bind(TaskStatus::Done.id())
        .fetch_all(pool)
        .await
    }
}
