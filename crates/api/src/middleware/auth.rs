//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use doctrack_core::error::CoreError;
use doctrack_core::permissions::Access;
use doctrack_core::types::DbId;
use doctrack_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user resolved from a JWT Bearer token in the
/// `Authorization` header.
///
/// The token's email is looked up in `users`; callers without a registered
/// user are rejected with 403.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.access.role_key, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    pub email: String,
    pub access: Access,
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

        let row = UserRepo::find_access_by_email(&state.pool, &claims.email)
            .await?
            .ok_or_else(|| {
                tracing::warn!(sub = %claims.sub, "Token for unregistered user");
                AppError::Core(CoreError::Forbidden("User is not registered".into()))
            })?;

        Ok(AuthUser {
            user_id: row.id,
            access: Access::new(&row.role_name, row.discipline_code.as_deref()),
            email: row.email,
        })
    }
}
