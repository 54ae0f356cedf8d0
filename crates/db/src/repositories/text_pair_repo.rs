//! Repository for the `text_pairs` table.

use annotate_core::ingest::ParsedPair;
use annotate_core::types::DbId;
use sqlx::PgPool;

use crate::models::text_pair::{TextPair, TextPairAnnotationRow, TextPairExportRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, dataset_id, text1, text2, assigned";

/// Provides storage and assignment-flag operations for text pairs.
pub struct TextPairRepo;

impl TextPairRepo {
    /// Bulk insert parsed pairs for a dataset. Returns the number inserted.
    pub async fn create_batch(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        dataset_id: DbId,
        pairs: &[ParsedPair],
    ) -> Result<u64, sqlx::Error> {
        if pairs.is_empty() {
            return Ok(0);
        }
        let text1: Vec<String> = pairs.iter().map(|p| p.text1.clone()).collect();
        let text2: Vec<String> = pairs.iter().map(|p| p.text2.clone()).collect();
        let result = sqlx::query(
            "INSERT INTO text_pairs (dataset_id, text1, text2) \
             SELECT $1, t1, t2 FROM UNNEST($2::text[], $3::text[]) AS u(t1, t2)",
        )
        .bind(dataset_id)
        .bind(&text1)
        .bind(&text2)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Find a text pair by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TextPair>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM text_pairs WHERE id = $1");
        sqlx::query_as::<_, TextPair>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every pair of a dataset ordered by ID.
    pub async fn list_by_dataset(
        pool: &PgPool,
        dataset_id: DbId,
    ) -> Result<Vec<TextPair>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM text_pairs WHERE dataset_id = $1 ORDER BY id");
        sqlx::query_as::<_, TextPair>(&query)
            .bind(dataset_id)
            .fetch_all(pool)
            .await
    }

    /// Lock and return the IDs of every unassigned pair in a dataset.
    ///
    /// Uses `FOR UPDATE` so a concurrent assignment on the same dataset
    /// blocks until this transaction ends and then re-checks `assigned`.
    pub async fn lock_unassigned_ids(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        dataset_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM text_pairs \
             WHERE dataset_id = $1 AND assigned = false \
             ORDER BY id \
             FOR UPDATE",
        )
        .bind(dataset_id)
        .fetch_all(&mut **tx)
        .await
    }

    /// Flag pairs as assigned. Returns the number of rows updated.
    pub async fn mark_assigned(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("UPDATE text_pairs SET assigned = true WHERE id = ANY($1)")
            .bind(ids)
            .execute(&mut **tx)
            .await?;
        Ok(result.rows_affected())
    }

    /// Clear `assigned` on those of `ids` that carry no annotation from anyone.
    pub async fn release_unannotated(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE text_pairs tp SET assigned = false \
             WHERE tp.id = ANY($1) \
               AND NOT EXISTS (SELECT 1 FROM annotations a WHERE a.text_pair_id = tp.id)",
        )
        .bind(ids)
        .execute(&mut **tx)
        .await?;
        Ok(result.rows_affected())
    }

    /// Number of pairs in a dataset.
    pub async fn count_by_dataset(pool: &PgPool, dataset_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM text_pairs WHERE dataset_id = $1")
            .bind(dataset_id)
            .fetch_one(pool)
            .await
    }

    /// Number of distinct pairs of a dataset with at least one annotation.
    pub async fn count_annotated(pool: &PgPool, dataset_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(DISTINCT a.text_pair_id) \
             FROM annotations a \
             JOIN text_pairs tp ON tp.id = a.text_pair_id \
             WHERE tp.dataset_id = $1",
        )
        .bind(dataset_id)
        .fetch_one(pool)
        .await
    }

    /// One page of a dataset's pairs, each joined with its earliest annotation.
    pub async fn list_page_with_annotation(
        pool: &PgPool,
        dataset_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<TextPairAnnotationRow>, sqlx::Error> {
        sqlx::query_as::<_, TextPairAnnotationRow>(
            "SELECT tp.id, tp.text1, tp.text2, tp.assigned,
                    fa.id AS annotation_id, fa.class_id, fa.class_name,
                    fa.user_id AS annotator_id, fa.annotated_at
             FROM text_pairs tp
             LEFT JOIN LATERAL (
                 SELECT a.id, a.class_id, c.name AS class_name, a.user_id, a.annotated_at
                 FROM annotations a
                 JOIN dataset_classes c ON c.id = a.class_id
                 WHERE a.text_pair_id = tp.id
                 ORDER BY a.annotated_at, a.id
                 LIMIT 1
             ) fa ON true
             WHERE tp.dataset_id = $1
             ORDER BY tp.id
             LIMIT $2 OFFSET $3",
        )
        .bind(dataset_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
    }

    /// Every pair of a dataset with its most recent annotation's class name.
    pub async fn list_for_export(
        pool: &PgPool,
        dataset_id: DbId,
    ) -> Result<Vec<TextPairExportRow>, sqlx::Error> {
        sqlx::query_as::<_, TextPairExportRow>(
            "SELECT tp.text1, tp.text2, la.class_name
             FROM text_pairs tp
             LEFT JOIN LATERAL (
                 SELECT c.name AS class_name
                 FROM annotations a
                 JOIN dataset_classes c ON c.id = a.class_id
                 WHERE a.text_pair_id = tp.id
                 ORDER BY a.annotated_at DESC, a.id DESC
                 LIMIT 1
             ) la ON true
             WHERE tp.dataset_id = $1
             ORDER BY tp.id",
        )
        .bind(dataset_id)
        .fetch_all(pool)
        .await
    }
}
