//! Handler for the admin statistics dashboard.

use axum::extract::State;
use axum::Json;

use crate::engine::statistics::{self, Dashboard};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// GET /api/v1/admin/statistics
pub async fn dashboard(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Dashboard>>> {
    let dashboard = statistics::dashboard(&state.pool, &state.activity, admin.user_id).await?;
    Ok(ok("Statistics computed", dashboard))
}
