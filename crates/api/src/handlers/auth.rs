//! Handlers for the `/auth` resource (login, logout).

use annotate_core::activity::actions;
use annotate_core::error::CoreError;
use annotate_db::models::user::UserResponse;
use annotate_db::repositories::UserRepo;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::verify_password;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::{ok, ApiResponse};
use crate::state::AppState;

/// Request body for `POST /auth/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// POST /api/v1/auth/login
///
/// Authenticate with username + password and receive a bearer token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid username or password".into(),
            ))
        })?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        )));
    }

    if !user.is_active {
        return Err(AppError::Core(CoreError::Forbidden(
            "Account is deactivated".into(),
        )));
    }

    let profile = UserResponse::from(&user);
    let token = generate_access_token(user.id, &profile.role, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    state
        .activity
        .record(
            actions::USER_LOGIN,
            format!("User '{}' logged in", user.username),
            Some(user.id),
        )
        .await;

    Ok(ok(
        "Login successful",
        LoginResponse {
            token,
            expires_in: state.config.jwt.expires_in_secs(),
            user: profile,
        },
    ))
}

/// POST /api/v1/auth/logout
///
/// Revoke the presented token until it expires.
pub async fn logout(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<()>>> {
    state.denylist.insert(user.jti.clone(), user.expires_at);
    state
        .activity
        .record(
            actions::USER_LOGOUT,
            format!("User {} logged out", user.user_id),
            Some(user.user_id),
        )
        .await;
    Ok(Json(ApiResponse::ok_empty("Logout successful")))
}
