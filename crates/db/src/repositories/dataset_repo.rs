//! Repository for the `datasets` table.

use annotate_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::dataset::{CreateDataset, Dataset, DatasetTaskTotals};
use crate::models::status::TaskStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, created_at, updated_at";

/// Provides CRUD and aggregate queries for datasets.
pub struct DatasetRepo;

impl DatasetRepo {
    /// Insert a new dataset inside an open transaction.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        input: &CreateDataset,
    ) -> Result<Dataset, sqlx::Error> {
        let query = format!(
            "INSERT INTO datasets (name, description) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Dataset>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut **tx)
            .await
    }

    /// Find a dataset by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Dataset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM datasets WHERE id = $1");
        sqlx::query_as::<_, Dataset>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One page of datasets, newest first.
    pub async fn list_page(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Dataset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM datasets ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Dataset>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of datasets.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM datasets")
            .fetch_one(pool)
            .await
    }

    /// Number of datasets created strictly before `before`.
    pub async fn count_created_before(
        pool: &PgPool,
        before: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM datasets WHERE created_at < $1")
            .bind(before)
            .fetch_one(pool)
            .await
    }

    /// Total and completed task counts for every dataset that has tasks.
    pub async fn task_totals(pool: &PgPool) -> Result<Vec<DatasetTaskTotals>, sqlx::Error> {
        sqlx::query_as::<_, DatasetTaskTotals>(
            "SELECT dataset_id,
                    COUNT(*) AS total,
                    COUNT(*) FILTER (WHERE status_id = $1) AS completed
             FROM tasks
             GROUP BY dataset_id
             ORDER BY dataset_id",
        )
        .bind(TaskStatus::Done.id())
        .fetch_all(pool)
        .await
    }
}
