//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! carry the required permission.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use doctrack_core::error::CoreError;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires project write access (administrators). Rejects with 403 otherwise.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.access.can_write_projects() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Admin role required".into(),
            )));
        }
        Ok(RequireAdmin(user))
    }
}

/// Requires document management (administrators and document control).
///
/// ```ignore
/// async fn import(RequireDocumentManager(user): RequireDocumentManager) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireDocumentManager(pub AuthUser);

impl FromRequestParts<AppState> for RequireDocumentManager {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        if !user.access.can_manage_documents() {
            return Err(AppError::Core(CoreError::Forbidden(
                "Document management permission required".into(),
            )));
        }
        Ok(RequireDocumentManager(user))
    }
}
