//! Repository for the `annotations` table.

use annotate_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::annotation::{Annotation, DailyAnnotationCount};

const COLUMNS: &str = "id, text_pair_id, user_id, class_id, annotated_at";

/// Provides annotation writes and time-bucketed counts.
pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Whether `user_id` has already annotated `text_pair_id`.
    pub async fn exists(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        text_pair_id: DbId,
        user_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM annotations WHERE text_pair_id = $1 AND user_id = $2)",
        )
        .bind(text_pair_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await
    }

    /// Insert an annotation stamped with the current time.
    ///
    /// A second annotation for the same (pair, user) violates
    /// `uq_annotations_text_pair_user`.
    pub async fn create(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        text_pair_id: DbId,
        user_id: DbId,
        class_id: DbId,
    ) -> Result<Annotation, sqlx::Error> {
        let query = format!(
            "INSERT INTO annotations (text_pair_id, user_id, class_id) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Annotation>(&query)
            .bind(text_pair_id)
            .bind(user_id)
            .bind(class_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Count annotations for one pair (all annotators). Test support.
    pub async fn count_for_pair(pool: &PgPool, text_pair_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM annotations WHERE text_pair_id = $1")
            .bind(text_pair_id)
            .fetch_one(pool)
            .await
    }

    /// Count annotations with `from <= annotated_at < to`.
    pub async fn count_between(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM annotations WHERE annotated_at >= $1 AND annotated_at < $2",
        )
        .bind(from)
        .bind(to)
        .fetch_one(pool)
        .await
    }

    /// Annotation counts per UTC day since `since`, only for days with data.
    pub async fn daily_counts_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<DailyAnnotationCount>, sqlx::Error> {
        sqlx::query_as::<_, DailyAnnotationCount>(
            "SELECT (annotated_at AT TIME ZONE 'UTC')::date AS day, COUNT(*) AS count
             FROM annotations
             WHERE annotated_at >= $1
             GROUP BY day
             ORDER BY day",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }
}
