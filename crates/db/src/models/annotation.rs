//! Annotation entity model.

use annotate_core::types::{DbId, Timestamp};
use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `annotations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Annotation {
    pub id: DbId,
    pub text_pair_id: DbId,
    pub user_id: DbId,
    pub class_id: DbId,
    pub annotated_at: Timestamp,
}

/// Number of annotations recorded on one UTC day.
#[derive(Debug, Clone, FromRow)]
pub struct DailyAnnotationCount {
    pub day: NaiveDate,
    pub count: i64,
}
