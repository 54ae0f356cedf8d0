//! Annotation class model (`dataset_classes`).

use annotate_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A label that annotators may choose for pairs of one dataset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DatasetClass {
    pub id: DbId,
    pub dataset_id: DbId,
    pub name: String,
}
