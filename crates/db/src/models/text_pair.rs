//! Text pair entity model and projections.

use annotate_core::export::ExportRow;
use annotate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `text_pairs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TextPair {
    pub id: DbId,
    pub dataset_id: DbId,
    pub text1: String,
    pub text2: String,
    pub assigned: bool,
}

/// A text pair with its earliest annotation, for the pair browser.
#[derive(Debug, Clone, FromRow)]
pub struct TextPairAnnotationRow {
    pub id: DbId,
    pub text1: String,
    pub text2: String,
    pub assigned: bool,
    pub annotation_id: Option<DbId>,
    pub class_id: Option<DbId>,
    pub class_name: Option<String>,
    pub annotator_id: Option<DbId>,
    pub annotated_at: Option<Timestamp>,
}

/// One exported line: both texts and the latest annotation's class name.
#[derive(Debug, Clone, FromRow)]
pub struct TextPairExportRow {
    pub text1: String,
    pub text2: String,
    pub class_name: Option<String>,
}

impl From<TextPairExportRow> for ExportRow {
    fn from(row: TextPairExportRow) -> Self {
        Self {
            text1: row.text1,
            text2: row.text2,
            annotation: row.class_name,
        }
    }
}
