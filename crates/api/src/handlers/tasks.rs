//! Handlers for the annotator workspace under `/tasks`.

use annotate_core::types::DbId;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::engine::annotation::{self, DatasetTaskSummary, WorkspaceTask};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::query::WorkspaceParams;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// GET /api/v1/tasks/annotator/{id}?dataset_id&page
pub async fn workspace(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(annotator_id): Path<DbId>,
    Query(params): Query<WorkspaceParams>,
) -> AppResult<Json<ApiResponse<WorkspaceTask>>> {
    user.ensure_can_act_for(annotator_id)?;
    let task = annotation::tasks_for_annotator(
        &state.pool,
        &state.activity,
        user.user_id,
        annotator_id,
        params.dataset_id,
        params.page,
    )
    .await?;
    Ok(ok("Task retrieved", task))
}

/// GET /api/v1/tasks/annotator/{id}/summary
pub async fn summary(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Path(annotator_id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<DatasetTaskSummary>>>> {
    user.ensure_can_act_for(annotator_id)?;
    let summary = annotation::task_summary(&state.pool, annotator_id).await?;
    Ok(ok(
        format!("Tasks found in {} datasets", summary.len()),
        summary,
    ))
}
