//! Annotation recording and the annotator's task workspace.

use annotate_core::activity::actions;
use annotate_core::error::CoreError;
use annotate_core::types::{DbId, Timestamp};
use annotate_db::models::annotation::Annotation;
use annotate_db::models::class::DatasetClass;
use annotate_db::models::status::task_status_label;
use annotate_db::models::user::User;
use annotate_db::repositories::{
    AnnotationRepo, ClassRepo, ProgressMarkerRepo, TaskRepo, TextPairRepo, UserRepo,
};
use serde::Serialize;
use sqlx::PgPool;

use crate::engine::activity::ActivityRecorder;
use crate::engine::progress::{calculate_dataset_progress, find_dataset};
use crate::error::AppResult;

/// Description shown for datasets created without one.
pub const DEFAULT_DESCRIPTION: &str = "No description";

/// Record `annotator_id`'s class choice for a pair and close their task.
///
/// Failures are logged against `actor_id`, the authenticated caller, since
/// `annotator_id` may not name an existing user. A second annotation of the
/// same pair by the same annotator is a conflict, whether caught by the
/// existence check or by the unique index when two submissions race.
pub async fn record_annotation(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
    annotator_id: DbId,
    text_pair_id: DbId,
    class_id: DbId,
) -> AppResult<Annotation> {
    match try_record(pool, annotator_id, text_pair_id, class_id).await {
        Ok((annotation, class)) => {
            activity
                .record(
                    actions::ANNOTATION_CREATED,
                    format!(
                        "Text pair {text_pair_id} annotated as '{}' by annotator {annotator_id}",
                        class.name
                    ),
                    Some(annotator_id),
                )
                .await;
            Ok(annotation)
        }
        Err(err) => {
            activity
                .record_failure(
                    actions::ANNOTATION_ERROR,
                    &format!(
                        "Failed to annotate text pair {text_pair_id} for annotator {annotator_id}"
                    ),
                    &err,
                    Some(actor_id),
                )
                .await;
            Err(err)
        }
    }
}

async fn try_record(
    pool: &PgPool,
    annotator_id: DbId,
    text_pair_id: DbId,
    class_id: DbId,
) -> AppResult<(Annotation, DatasetClass)> {
    let pair = TextPairRepo::find_by_id(pool, text_pair_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "TextPair",
            id: text_pair_id,
        })?;
    find_annotator(pool, annotator_id).await?;
    let class = ClassRepo::find_by_id(pool, class_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Class",
            id: class_id,
        })?;
    if class.dataset_id != pair.dataset_id {
        return Err(CoreError::Validation(format!(
            "Class {class_id} does not belong to the dataset of text pair {text_pair_id}"
        ))
        .into());
    }

    let mut tx = pool.begin().await?;
    if AnnotationRepo::exists(&mut tx, text_pair_id, annotator_id).await? {
        return Err(CoreError::Conflict(
            "This text pair has already been annotated by this annotator".into(),
        )
        .into());
    }
    let annotation = AnnotationRepo::create(&mut tx, text_pair_id, annotator_id, class_id).await?;
    let closed = TaskRepo::complete_for_pair(&mut tx, text_pair_id, annotator_id).await?;
    tx.commit().await?;

    if closed == 0 {
        tracing::debug!(
            text_pair_id,
            annotator_id,
            "Annotation recorded without a matching task"
        );
    }
    Ok((annotation, class))
}

pub(crate) async fn find_annotator(pool: &PgPool, annotator_id: DbId) -> AppResult<User> {
    Ok(UserRepo::find_annotator(pool, annotator_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Annotator",
            id: annotator_id,
        })?)
}

#[derive(Debug, Serialize)]
pub struct WorkspacePair {
    pub id: DbId,
    pub text1: String,
    pub text2: String,
    pub status: &'static str,
    pub created_at: Timestamp,
    pub deadline_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    /// Class the annotator chose, once annotated.
    pub annotation: Option<String>,
}

/// One page of the annotator workspace: a single task.
#[derive(Debug, Serialize)]
pub struct WorkspaceTask {
    pub task_id: DbId,
    pub dataset_id: DbId,
    pub dataset_name: String,
    pub text_pair: WorkspacePair,
    pub progress: f64,
    pub current_page: i64,
    pub total_pages: i64,
    pub total_tasks: i64,
    pub classes: Vec<DatasetClass>,
}

/// Clamp a requested workspace page to the annotator's task range.
fn clamp_page(page: i64, total: i64) -> i64 {
    page.clamp(0, (total - 1).max(0))
}

/// Show one of the annotator's tasks, one task per page.
///
/// Without an explicit page the last viewed page is resumed. The shown page
/// is remembered for next time. Failures are logged against `actor_id`.
pub async fn tasks_for_annotator(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
    annotator_id: DbId,
    dataset_id: DbId,
    page: Option<i64>,
) -> AppResult<WorkspaceTask> {
    let result = try_workspace(pool, annotator_id, dataset_id, page).await;
    if let Err(err) = &result {
        activity
            .record_failure(
                actions::TASKS_FETCH_ERROR,
                &format!(
                    "Failed to load tasks of annotator {annotator_id} in dataset {dataset_id}"
                ),
                err,
                Some(actor_id),
            )
            .await;
    }
    result
}

async fn try_workspace(
    pool: &PgPool,
    annotator_id: DbId,
    dataset_id: DbId,
    page: Option<i64>,
) -> AppResult<WorkspaceTask> {
    let dataset = find_dataset(pool, dataset_id).await?;
    find_annotator(pool, annotator_id).await?;

    let total_tasks = TaskRepo::count_for_annotator(pool, dataset_id, annotator_id).await?;
    if total_tasks == 0 {
        return Err(
            CoreError::Validation("No tasks found for annotator and dataset".into()).into(),
        );
    }

    let requested = match page {
        Some(page) => page,
        None => ProgressMarkerRepo::find(pool, annotator_id, dataset_id)
            .await?
            .map_or(0, |marker| marker.last_page),
    };
    let current_page = clamp_page(requested, total_tasks);

    let row = TaskRepo::find_annotator_task_at(pool, dataset_id, annotator_id, current_page)
        .await?
        .ok_or_else(|| CoreError::Internal("Task page vanished while reading".into()))?;
    ProgressMarkerRepo::upsert(pool, annotator_id, dataset_id, current_page).await?;

    let progress = calculate_dataset_progress(pool, dataset_id).await?;
    let classes = ClassRepo::list_by_dataset(pool, dataset_id).await?;

    Ok(WorkspaceTask {
        task_id: row.task_id,
        dataset_id,
        dataset_name: dataset.name,
        text_pair: WorkspacePair {
            id: row.text_pair_id,
            text1: row.text1,
            text2: row.text2,
            status: task_status_label(row.status_id),
            created_at: row.created_at,
            deadline_at: row.deadline_at,
            completed_at: row.completed_at,
            annotation: row.class_name,
        },
        progress,
        current_page,
        total_pages: total_tasks,
        total_tasks,
        classes,
    })
}

/// Per-dataset overview of an annotator's tasks.
#[derive(Debug, Serialize)]
pub struct DatasetTaskSummary {
    pub dataset_id: DbId,
    pub dataset_name: String,
    pub description: String,
    pub task_ids: Vec<DbId>,
    pub text_pair_count: i64,
    /// `"annotated/total"`.
    pub progress: String,
}

pub async fn task_summary(
    pool: &PgPool,
    annotator_id: DbId,
) -> AppResult<Vec<DatasetTaskSummary>> {
    find_annotator(pool, annotator_id).await?;
    Ok(TaskRepo::summarize_for_annotator(pool, annotator_id)
        .await?
        .into_iter()
        .map(|row| DatasetTaskSummary {
            progress: format!("{}/{}", row.annotated_count, row.text_pair_count),
            dataset_id: row.dataset_id,
            dataset_name: row.dataset_name,
            description: row
                .description
                .filter(|d| !d.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
            task_ids: row.task_ids,
            text_pair_count: row.text_pair_count,
        })
        .collect())
}
