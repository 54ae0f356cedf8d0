//! Dataset entity model and DTOs.

use annotate_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `datasets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Dataset {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateDataset {
    pub name: String,
    pub description: Option<String>,
}

/// Total and completed task counts for one dataset that has tasks.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct DatasetTaskTotals {
    pub dataset_id: DbId,
    pub total: i64,
    pub completed: i64,
}

impl From<DatasetTaskTotals> for annotate_core::progress::DatasetTaskCounts {
    fn from(row: DatasetTaskTotals) -> Self {
        Self {
            dataset_id: row.dataset_id,
            total: row.total,
            completed: row.completed,
        }
    }
}
