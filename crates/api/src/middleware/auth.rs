//! JWT-based authentication extractor for Axum handlers.

use annotate_core::error::CoreError;
use annotate_core::types::{DbId, Timestamp};
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// Tokens revoked through `POST /auth/logout` are rejected even while their
/// signature and expiry are still valid.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    /// The user's role name (`"admin"` or `"annotator"`).
    pub role: String,
    /// Token id, used to revoke this token on logout.
    pub jti: String,
    pub expires_at: Timestamp,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        if state.denylist.contains(&claims.jti) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Token has been revoked".into(),
            )));
        }

        let expires_at = claims.expires_at();
        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
            jti: claims.jti,
            expires_at,
        })
    }
}
