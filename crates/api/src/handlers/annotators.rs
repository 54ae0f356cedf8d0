//! Handlers for annotator account management under `/admin/annotators`.
//!
//! Passwords are generated server-side and returned exactly once in the
//! response that created or reset them.

use annotate_core::activity::actions;
use annotate_core::credentials::{generate_password, GENERATED_PASSWORD_LENGTH};
use annotate_core::error::CoreError;
use annotate_core::types::DbId;
use annotate_db::models::role::UserRole;
use annotate_db::models::user::{CreateUser, UpdateUser, User, UserResponse};
use annotate_db::repositories::UserRepo;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_body;
use crate::auth::password::hash_password;
use crate::engine::annotation::find_annotator;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAnnotatorRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateAnnotatorRequest {
    #[validate(length(min = 1, message = "Username cannot be empty"))]
    pub username: Option<String>,
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    pub is_active: Option<bool>,
    #[serde(default)]
    pub regenerate_password: bool,
}

/// An annotator account together with a freshly generated password.
#[derive(Debug, Serialize)]
pub struct AnnotatorCredentials {
    pub annotator: UserResponse,
    /// Plaintext password, present only when one was generated by this call.
    pub password: Option<String>,
}

fn hash(password: &str) -> AppResult<String> {
    hash_password(password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))
}

/// Reject `username` / `email` already used by an account other than `current`.
async fn ensure_unique(
    state: &AppState,
    username: Option<&str>,
    email: Option<&str>,
    current: Option<DbId>,
) -> AppResult<()> {
    if let Some(username) = username {
        if let Some(existing) = UserRepo::find_by_username(&state.pool, username).await? {
            if Some(existing.id) != current {
                return Err(
                    CoreError::Conflict(format!("Username '{username}' is already taken")).into(),
                );
            }
        }
    }
    if let Some(email) = email {
        if let Some(existing) = UserRepo::find_by_email(&state.pool, email).await? {
            if Some(existing.id) != current {
                return Err(
                    CoreError::Conflict(format!("Email '{email}' is already in use")).into(),
                );
            }
        }
    }
    Ok(())
}

/// GET /api/v1/admin/annotators
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<UserResponse>>>> {
    let annotators = UserRepo::list_by_role(&state.pool, UserRole::Annotator).await?;
    let annotators: Vec<UserResponse> = annotators.iter().map(UserResponse::from).collect();
    Ok(ok(
        format!("{} annotators found", annotators.len()),
        annotators,
    ))
}

/// GET /api/v1/admin/annotators/{id}
pub async fn get(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    match find_annotator(&state.pool, id).await {
        Ok(user) => Ok(ok("Annotator found", UserResponse::from(&user))),
        Err(err) => {
            state
                .activity
                .record_failure(
                    actions::ANNOTATOR_FETCH_ERROR,
                    &format!("Failed to fetch annotator {id}"),
                    &err,
                    Some(admin.user_id),
                )
                .await;
            Err(err)
        }
    }
}

/// POST /api/v1/admin/annotators
pub async fn create(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAnnotatorRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<AnnotatorCredentials>>)> {
    match try_create(&state, &input).await {
        Ok(created) => {
            state
                .activity
                .record(
                    actions::USER_CREATED,
                    format!("Annotator '{}' created", created.annotator.username),
                    Some(admin.user_id),
                )
                .await;
            Ok((
                StatusCode::CREATED,
                Json(ApiResponse::success("Annotator created", created)),
            ))
        }
        Err(err) => {
            state
                .activity
                .record_failure(
                    actions::USER_CREATION_ERROR,
                    &format!("Failed to create annotator '{}'", input.username),
                    &err,
                    Some(admin.user_id),
                )
                .await;
            Err(err)
        }
    }
}

async fn try_create(
    state: &AppState,
    input: &CreateAnnotatorRequest,
) -> AppResult<AnnotatorCredentials> {
    validate_body(input)?;
    let username = input.username.trim();
    let email = input.email.trim();
    ensure_unique(state, Some(username), Some(email), None).await?;

    let password = generate_password(GENERATED_PASSWORD_LENGTH);
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            first_name: input.first_name.trim().to_string(),
            last_name: input.last_name.trim().to_string(),
            username: username.to_string(),
            email: email.to_string(),
            password_hash: hash(&password)?,
            role_id: UserRole::Annotator.id(),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "Annotator created");
    Ok(AnnotatorCredentials {
        annotator: UserResponse::from(&user),
        password: Some(password),
    })
}

/// PUT /api/v1/admin/annotators/{id}
pub async fn update(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAnnotatorRequest>,
) -> AppResult<Json<ApiResponse<AnnotatorCredentials>>> {
    match try_update(&state, id, &input).await {
        Ok(updated) => {
            state
                .activity
                .record(
                    actions::ANNOTATOR_UPDATED,
                    format!(
                        "Annotator '{}' updated{}",
                        updated.annotator.username,
                        if updated.password.is_some() { " (password regenerated)" } else { "" }
                    ),
                    Some(admin.user_id),
                )
                .await;
            Ok(ok("Annotator updated", updated))
        }
        Err(err) => {
            state
                .activity
                .record_failure(
                    actions::ANNOTATOR_UPDATE_ERROR,
                    &format!("Failed to update annotator {id}"),
                    &err,
                    Some(admin.user_id),
                )
                .await;
            Err(err)
        }
    }
}

async fn try_update(
    state: &AppState,
    id: DbId,
    input: &UpdateAnnotatorRequest,
) -> AppResult<AnnotatorCredentials> {
    validate_body(input)?;
    find_annotator(&state.pool, id).await?;

    let trimmed = |v: &Option<String>| v.as_deref().map(str::trim).map(str::to_string);
    let changes = UpdateUser {
        first_name: trimmed(&input.first_name),
        last_name: trimmed(&input.last_name),
        username: trimmed(&input.username),
        email: trimmed(&input.email),
        is_active: input.is_active,
    };
    ensure_unique(
        state,
        changes.username.as_deref(),
        changes.email.as_deref(),
        Some(id),
    )
    .await?;

    let user: User = UserRepo::update(&state.pool, id, &changes)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Annotator",
            id,
        })?;

    let password = if input.regenerate_password {
        let password = generate_password(GENERATED_PASSWORD_LENGTH);
        UserRepo::update_password(&state.pool, id, &hash(&password)?).await?;
        Some(password)
    } else {
        None
    };

    Ok(AnnotatorCredentials {
        annotator: UserResponse::from(&user),
        password,
    })
}

/// DELETE /api/v1/admin/annotators/{id}
///
/// Soft delete: the account is deactivated, its tasks and annotations stay.
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ApiResponse<()>>> {
    let result = async {
        let user = find_annotator(&state.pool, id).await?;
        UserRepo::deactivate(&state.pool, id).await?;
        Ok::<_, AppError>(user)
    }
    .await;

    match result {
        Ok(user) => {
            state
                .activity
                .record(
                    actions::ANNOTATOR_DELETED,
                    format!("Annotator '{}' deactivated", user.username),
                    Some(admin.user_id),
                )
                .await;
            Ok(Json(ApiResponse::ok_empty("Annotator deactivated")))
        }
        Err(err) => {
            state
                .activity
                .record_failure(
                    actions::ANNOTATOR_DELETE_ERROR,
                    &format!("Failed to delete annotator {id}"),
                    &err,
                    Some(admin.user_id),
                )
                .await;
            Err(err)
        }
    }
}
