//! Task entity model and aggregate rows.

use annotate_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub dataset_id: DbId,
    /// `None` once the annotator has been unassigned.
    pub user_id: Option<DbId>,
    pub text_pair_id: DbId,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub started_at: Option<Timestamp>,
    pub deadline_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

/// One pair handed to one annotator by an assignment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewTask {
    pub user_id: DbId,
    pub text_pair_id: DbId,
}

/// A task joined with its pair and the annotator's chosen class, for the
/// annotator workspace.
#[derive(Debug, Clone, FromRow)]
pub struct AnnotatorTaskRow {
    pub task_id: DbId,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub deadline_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub text_pair_id: DbId,
    pub text1: String,
    pub text2: String,
    pub class_name: Option<String>,
}

/// Per-dataset summary of one annotator's tasks.
#[derive(Debug, Clone, FromRow)]
pub struct AnnotatorDatasetTasks {
    pub dataset_id: DbId,
    pub dataset_name: String,
    pub description: Option<String>,
    pub task_ids: Vec<DbId>,
    pub text_pair_count: i64,
    pub annotated_count: i64,
}

/// Completed vs. open task counts for one dataset.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DatasetStatusCounts {
    pub dataset_id: DbId,
    pub dataset_name: String,
    pub completed: i64,
    pub pending: i64,
}

/// Task totals for one annotator across every dataset.
#[derive(Debug, Clone, FromRow)]
pub struct AnnotatorTaskTotals {
    pub user_id: DbId,
    pub first_name: String,
    pub last_name: String,
    pub total: i64,
    pub completed: i64,
}
