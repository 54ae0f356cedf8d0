//! Handlers for `/admin/text-pairs`.

use annotate_core::types::DbId;
use axum::extract::{Path, Query, State};
use axum::Json;

use crate::engine::assignment::{self, UnassignSummary};
use crate::engine::progress::{self, TextPairPage};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// GET /api/v1/admin/text-pairs/dataset/{id}?page&size
pub async fn list_by_dataset(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(dataset_id): Path<DbId>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<ApiResponse<TextPairPage>>> {
    let page = progress::text_pair_page(&state.pool, dataset_id, params.to_request()).await?;
    Ok(ok("Text pairs retrieved", page))
}

/// POST /api/v1/admin/text-pairs/dataset/{id}/unassign/{annotator_id}
pub async fn unassign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((dataset_id, annotator_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<ApiResponse<UnassignSummary>>> {
    let summary = assignment::unassign(
        &state.pool,
        &state.activity,
        admin.user_id,
        dataset_id,
        annotator_id,
    )
    .await?;
    let message = if summary.released_tasks == 0 {
        "All tasks of this annotator are completed; nothing to unassign".to_string()
    } else {
        format!("{} tasks unassigned", summary.released_tasks)
    };
    Ok(ok(message, summary))
}
