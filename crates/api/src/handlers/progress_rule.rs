//! Handlers for the `/progress-rules` catalogue.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use doctrack_core::project::validate_progress_rule;
use doctrack_db::models::progress_rule::{CreateProgressRule, ProgressRule};
use doctrack_db::repositories::ProgressRuleRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/progress-rules
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<ProgressRule>>>> {
    let data = ProgressRuleRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/progress-rules
pub async fn create(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProgressRule>,
) -> AppResult<(StatusCode, Json<DataResponse<ProgressRule>>)> {
    validate_progress_rule(
        &input.revision_type,
        input.physical_percent,
        input.certification_percent,
    )?;
    let rule = ProgressRuleRepo::create(&state.pool, &input).await?;
    tracing::info!(rule_id = rule.id, user_id = user.user_id, "Progress rule created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: rule })))
}
