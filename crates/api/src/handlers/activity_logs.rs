//! Handler for the audit trail.

use annotate_db::models::activity::ActivityLog;
use annotate_db::repositories::ActivityLogRepo;
use axum::extract::{Query, State};
use axum::Json;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// GET /api/v1/admin/activity-logs?limit&offset
///
/// Newest entries first.
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Vec<ActivityLog>>>> {
    let (limit, offset) = params.activity_window();
    let logs = ActivityLogRepo::list(&state.pool, limit, offset).await?;
    Ok(ok(format!("{} activity entries", logs.len()), logs))
}
