//! Annotation submission, shared by the admin and annotator surfaces.

use annotate_core::error::CoreError;
use annotate_core::types::DbId;
use annotate_db::models::annotation::Annotation;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::engine::annotation::record_annotation;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireAdmin, RequireAuth};
use crate::response::ApiResponse;
use crate::state::AppState;

/// Request body for annotation submission.
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub text_pair_id: DbId,
    pub class_id: DbId,
    /// Annotator the annotation is recorded for. Annotators may omit it or
    /// pass their own id; admins must name the annotator.
    pub annotator_id: Option<DbId>,
}

type Created = (StatusCode, Json<ApiResponse<Annotation>>);

async fn submit(state: &AppState, user: &AuthUser, input: &AnnotateRequest) -> AppResult<Created> {
    let annotator_id = match input.annotator_id {
        Some(id) => id,
        None if user.is_admin() => {
            return Err(CoreError::Validation("annotator_id is required".into()).into())
        }
        None => user.user_id,
    };
    user.ensure_can_act_for(annotator_id)?;

    let annotation = record_annotation(
        &state.pool,
        &state.activity,
        user.user_id,
        annotator_id,
        input.text_pair_id,
        input.class_id,
    )
    .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Annotation saved", annotation)),
    ))
}

/// POST /api/v1/admin/annotations
pub async fn create_as_admin(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<AnnotateRequest>,
) -> AppResult<Created> {
    submit(&state, &admin, &input).await
}

/// POST /api/v1/tasks/annotate
pub async fn create(
    RequireAuth(user): RequireAuth,
    State(state): State<AppState>,
    Json(input): Json<AnnotateRequest>,
) -> AppResult<Created> {
    submit(&state, &user, &input).await
}
