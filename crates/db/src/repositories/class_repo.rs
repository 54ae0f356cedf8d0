//! Repository for the `dataset_classes` table.

use annotate_core::types::DbId;
use sqlx::PgPool;

use crate::models::class::DatasetClass;

const COLUMNS: &str = "id, dataset_id, name";

/// Provides storage for per-dataset annotation classes.
pub struct ClassRepo;

impl ClassRepo {
    /// Bulk insert class names for a dataset, returning the created rows.
    pub async fn create_batch(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        dataset_id: DbId,
        names: &[String],
    ) -> Result<Vec<DatasetClass>, sqlx::Error> {
        if names.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "INSERT INTO dataset_classes (dataset_id, name) \
             SELECT $1, n FROM UNNEST($2::text[]) WITH ORDINALITY AS u(n, ord) \
             ORDER BY ord \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DatasetClass>(&query)
            .bind(dataset_id)
            .bind(names)
            .fetch_all(&mut **tx)
            .await
    }

    /// Find a class by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DatasetClass>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM dataset_classes WHERE id = $1");
        sqlx::query_as::<_, DatasetClass>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Classes of one dataset in creation order.
    pub async fn list_by_dataset(
        pool: &PgPool,
        dataset_id: DbId,
    ) -> Result<Vec<DatasetClass>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM dataset_classes WHERE dataset_id = $1 ORDER BY id");
        sqlx::query_as::<_, DatasetClass>(&query)
            .bind(dataset_id)
            .fetch_all(pool)
            .await
    }

    /// Classes of several datasets, grouped by dataset then creation order.
    pub async fn list_by_datasets(
        pool: &PgPool,
        dataset_ids: &[DbId],
    ) -> Result<Vec<DatasetClass>, sqlx::Error> {
        if dataset_ids.is_empty() {
            return Ok(vec![]);
        }
        let query = format!(
            "SELECT {COLUMNS} FROM dataset_classes WHERE dataset_id = ANY($1) \
             ORDER BY dataset_id, id"
        );
        sqlx::query_as::<_, DatasetClass>(&query)
            .bind(dataset_ids)
            .fetch_all(pool)
            .await
    }
}
