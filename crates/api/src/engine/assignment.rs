//! Assignment engine: distributes a dataset's unassigned text pairs across
//! annotators, and takes unfinished work back.

use annotate_core::activity::actions;
use annotate_core::assignment::{dedup_preserving_order, resolve_deadline, shuffle_and_partition};
use annotate_core::error::CoreError;
use annotate_core::types::{DbId, Timestamp};
use annotate_db::models::status::TaskStatus;
use annotate_db::models::task::NewTask;
use annotate_db::models::user::{AnnotatorWorkload, User};
use annotate_db::repositories::{DatasetRepo, TaskRepo, TextPairRepo, UserRepo};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::engine::activity::ActivityRecorder;
use crate::error::{AppError, AppResult};

/// Body of an assignment request.
#[derive(Debug, Deserialize)]
pub struct AssignRequest {
    /// Must match the dataset id in the path.
    pub dataset_id: DbId,
    pub annotator_ids: Vec<DbId>,
    /// Defaults to seven days from now.
    pub deadline: Option<Timestamp>,
}

/// Pairs handed to one annotator by an assignment run.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatorShare {
    pub annotator_id: DbId,
    pub username: String,
    pub pair_count: usize,
}

/// Outcome of [`assign`].
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentSummary {
    pub dataset_id: DbId,
    pub total_pairs: usize,
    /// One entry per eligible annotator, in request order.
    pub annotators: Vec<AnnotatorShare>,
    pub deadline_at: Timestamp,
}

/// Outcome of [`unassign`].
#[derive(Debug, Clone, Serialize)]
pub struct UnassignSummary {
    pub dataset_id: DbId,
    pub annotator_id: DbId,
    /// Open tasks detached from the annotator. Zero means nothing changed.
    pub released_tasks: usize,
    /// Pairs whose `assigned` flag was cleared.
    pub released_pairs: u64,
}

/// Split every unassigned pair of `dataset_id` across the requested
/// annotators.
///
/// The request's `dataset_id` must equal `dataset_id`. Ineligible ids
/// (unknown users, admins) are dropped and duplicates keep their first
/// position. Runs in one transaction with the unassigned pairs
/// locked, so concurrent runs never claim the same pair.
pub async fn assign(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
    dataset_id: DbId,
    request: &AssignRequest,
) -> AppResult<AssignmentSummary> {
    match try_assign(pool, dataset_id, request).await {
        Ok(summary) => {
            activity
                .record(
                    actions::TASKS_ASSIGNED,
                    format!(
                        "Assigned {} text pairs of dataset {} to {} annotators, deadline {}",
                        summary.total_pairs,
                        dataset_id,
                        summary.annotators.len(),
                        summary.deadline_at.format("%Y-%m-%d %H:%M UTC"),
                    ),
                    Some(actor_id),
                )
                .await;
            Ok(summary)
        }
        Err(err) => {
            activity
                .record_failure(
                    actions::TASK_ASSIGNMENT_ERROR,
                    &format!("Failed to assign tasks for dataset {dataset_id}"),
                    &err,
                    Some(actor_id),
                )
                .await;
            Err(err)
        }
    }
}

async fn try_assign(
    pool: &PgPool,
    dataset_id: DbId,
    request: &AssignRequest,
) -> AppResult<AssignmentSummary> {
    if request.dataset_id != dataset_id {
        return Err(CoreError::Validation(format!(
            "Dataset ID in body ({}) does not match path ({dataset_id})",
            request.dataset_id
        ))
        .into());
    }
    ensure_dataset(pool, dataset_id).await?;
    if request.annotator_ids.is_empty() {
        return Err(CoreError::Validation("At least one annotator must be selected".into()).into());
    }

    let annotators = eligible_annotators(pool, &request.annotator_ids).await?;
    if annotators.is_empty() {
        return Err(CoreError::Validation("No valid annotators found".into()).into());
    }

    let deadline_at = resolve_deadline(request.deadline, Utc::now());
    let mut tx = pool.begin().await?;

    let pair_ids = TextPairRepo::lock_unassigned_ids(&mut tx, dataset_id).await?;
    let chunks = {
        let mut rng = rand::rng();
        shuffle_and_partition(pair_ids, annotators.len(), &mut rng)?
    };

    let new_tasks: Vec<NewTask> = annotators
        .iter()
        .zip(&chunks)
        .flat_map(|(annotator, chunk)| {
            chunk.iter().map(move |&text_pair_id| NewTask {
                user_id: annotator.id,
                text_pair_id,
            })
        })
        .collect();
    let pair_ids: Vec<DbId> = new_tasks.iter().map(|t| t.text_pair_id).collect();

    TaskRepo::create_batch(&mut tx, dataset_id, &new_tasks, deadline_at).await?;
    TextPairRepo::mark_assigned(&mut tx, &pair_ids).await?;
    tx.commit().await?;

    tracing::info!(
        dataset_id,
        total_pairs = pair_ids.len(),
        annotators = annotators.len(),
        "Assigned text pairs"
    );

    Ok(AssignmentSummary {
        dataset_id,
        total_pairs: pair_ids.len(),
        annotators: annotators
            .into_iter()
            .zip(&chunks)
            .map(|(annotator, chunk)| AnnotatorShare {
                annotator_id: annotator.id,
                username: annotator.username,
                pair_count: chunk.len(),
            })
            .collect(),
        deadline_at,
    })
}

/// Resolve requested ids to annotator users, keeping request order.
async fn eligible_annotators(pool: &PgPool, requested: &[DbId]) -> AppResult<Vec<User>> {
    let ids = dedup_preserving_order(requested);
    let found = UserRepo::find_annotators_by_ids(pool, &ids).await?;
    Ok(ids
        .iter()
        .filter_map(|id| found.iter().find(|u| u.id == *id).cloned())
        .collect())
}

/// Take back an annotator's unfinished tasks in one dataset.
///
/// DONE tasks stay with the annotator. A released pair keeps its `assigned`
/// flag if anyone has already annotated it.
pub async fn unassign(
    pool: &PgPool,
    activity: &ActivityRecorder,
    actor_id: DbId,
    dataset_id: DbId,
    annotator_id: DbId,
) -> AppResult<UnassignSummary> {
    match try_unassign(pool, dataset_id, annotator_id).await {
        Ok(summary) => {
            activity
                .record(
                    actions::ANNOTATOR_UNASSIGNED,
                    format!(
                        "Unassigned annotator {annotator_id} from dataset {dataset_id}: \
                         {} tasks released",
                        summary.released_tasks
                    ),
                    Some(actor_id),
                )
                .await;
            Ok(summary)
        }
        Err(err) => {
            activity
                .record_failure(
                    actions::ANNOTATOR_UNASSIGN_ERROR,
                    &format!(
                        "Failed to unassign annotator {annotator_id} from dataset {dataset_id}"
                    ),
                    &err,
                    Some(actor_id),
                )
                .await;
            Err(err)
        }
    }
}

async fn try_unassign(
    pool: &PgPool,
    dataset_id: DbId,
    annotator_id: DbId,
) -> AppResult<UnassignSummary> {
    ensure_dataset(pool, dataset_id).await?;
    UserRepo::find_annotator(pool, annotator_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Annotator",
            id: annotator_id,
        })?;

    let mut tx = pool.begin().await?;
    let tasks = TaskRepo::lock_for_annotator(&mut tx, dataset_id, annotator_id).await?;
    if tasks.is_empty() {
        return Err(CoreError::Validation(
            "No tasks found for this annotator in this dataset".into(),
        )
        .into());
    }

    let open: Vec<_> = tasks
        .iter()
        .filter(|t| t.status_id != TaskStatus::Done.id())
        .collect();
    if open.is_empty() {
        return Ok(UnassignSummary {
            dataset_id,
            annotator_id,
            released_tasks: 0,
            released_pairs: 0,
        });
    }

    let task_ids: Vec<DbId> = open.iter().map(|t| t.id).collect();
    let pair_ids: Vec<DbId> = open.iter().map(|t| t.text_pair_id).collect();
    TaskRepo::release(&mut tx, &task_ids).await?;
    let released_pairs = TextPairRepo::release_unannotated(&mut tx, &pair_ids).await?;
    tx.commit().await?;

    Ok(UnassignSummary {
        dataset_id,
        annotator_id,
        released_tasks: task_ids.len(),
        released_pairs,
    })
}

/// Annotators with no task in `dataset_id`, with their overall task count.
pub async fn available_annotators(
    pool: &PgPool,
    dataset_id: DbId,
) -> AppResult<Vec<AnnotatorWorkload>> {
    ensure_dataset(pool, dataset_id).await?;
    Ok(UserRepo::list_available_for_dataset(pool, dataset_id).await?)
}

async fn ensure_dataset(pool: &PgPool, dataset_id: DbId) -> Result<(), AppError> {
    DatasetRepo::find_by_id(pool, dataset_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Dataset",
            id: dataset_id,
        })?;
    Ok(())
}
