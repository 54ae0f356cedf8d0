//! Handlers for `/admin/datasets`: listing, upload, details, assignment and
//! CSV download.

use annotate_core::types::DbId;
use annotate_db::models::dataset::Dataset;
use annotate_db::models::user::AnnotatorWorkload;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use crate::engine::assignment::{self, AssignRequest, AssignmentSummary};
use crate::engine::ingestion::{self, CreatedDataset, DatasetUpload};
use crate::engine::progress::{self, DatasetDetails, DatasetPage};
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PageParams;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// GET /api/v1/admin/datasets?page&size
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<ApiResponse<DatasetPage>>> {
    let page = progress::list_datasets(&state.pool, params.to_request()).await?;
    Ok(ok("Datasets retrieved", page))
}

/// POST /api/v1/admin/datasets
///
/// Multipart form with `name`, `description`, `classes` (`;`-separated) and
/// `file` fields.
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<CreatedDataset>>)> {
    let mut upload = DatasetUpload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "file" => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.file = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?
                    .to_vec();
            }
            "name" | "description" | "classes" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match field_name.as_str() {
                    "name" => upload.name = value,
                    "description" => upload.description = Some(value),
                    _ => upload.classes = value,
                }
            }
            other => tracing::debug!(field = other, "Ignoring unknown multipart field"),
        }
    }

    let created =
        ingestion::create_dataset(&state.pool, &state.activity, admin.user_id, upload).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success("Dataset created", created)),
    ))
}

/// GET /api/v1/admin/datasets/{id}
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Dataset>>> {
    let dataset = progress::find_dataset(&state.pool, id).await?;
    Ok(ok("Dataset found", dataset))
}

/// GET /api/v1/admin/datasets/{id}/details
pub async fn details(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<DatasetDetails>>> {
    let details = progress::dataset_details(&state.pool, id).await?;
    Ok(ok("Dataset details retrieved", details))
}

/// GET /api/v1/admin/datasets/{id}/available-annotators
pub async fn available_annotators(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<Vec<AnnotatorWorkload>>>> {
    let annotators = assignment::available_annotators(&state.pool, id).await?;
    Ok(ok(
        format!("{} annotators available", annotators.len()),
        annotators,
    ))
}

/// POST /api/v1/admin/datasets/{id}/assign
pub async fn assign(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AssignRequest>,
) -> AppResult<Json<ApiResponse<AssignmentSummary>>> {
    let summary =
        assignment::assign(&state.pool, &state.activity, admin.user_id, id, &input).await?;
    Ok(ok(
        format!(
            "{} text pairs assigned to {} annotators",
            summary.total_pairs,
            summary.annotators.len()
        ),
        summary,
    ))
}

/// GET /api/v1/admin/datasets/{id}/download
pub async fn download(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let export = ingestion::export_csv(&state.pool, &state.activity, admin.user_id, id).await?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.content,
    ))
}
