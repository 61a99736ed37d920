//! Handlers for the notification feed.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use doctrack_core::error::CoreError;
use doctrack_core::notification::{clamp_feed_limit, dedupe_ids};
use doctrack_core::types::DbId;
use doctrack_db::models::notification::{CreateNotification, NotificationWithSeen};
use doctrack_db::repositories::NotificationRepo;
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct NotificationFeed {
    pub items: Vec<NotificationWithSeen>,
    pub unseen: i64,
}

#[derive(Debug, Deserialize)]
pub struct MarkSeenRequest {
    pub ids: Vec<DbId>,
}

#[derive(Debug, Serialize)]
pub struct MarkSeenResult {
    pub marked: u64,
}

#[derive(Debug, Serialize)]
pub struct CreatedNotification {
    pub id: DbId,
}

/// GET /api/v1/notifications?limit=
pub async fn list(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<NotificationFeed>>> {
    let limit = clamp_feed_limit(params.limit);
    let items = NotificationRepo::list_for_user(&state.pool, user.user_id, limit).await?;
    let unseen = NotificationRepo::unseen_count(&state.pool, user.user_id).await?;
    Ok(Json(DataResponse {
        data: NotificationFeed { items, unseen },
    }))
}

/// POST /api/v1/notifications/seen
///
/// Idempotent: ids already marked, unknown or repeated are skipped.
pub async fn mark_seen(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<MarkSeenRequest>,
) -> AppResult<Json<DataResponse<MarkSeenResult>>> {
    let ids = dedupe_ids(&input.ids);
    let marked = NotificationRepo::mark_seen(&state.pool, user.user_id, &ids).await?;
    tracing::debug!(user_id = user.user_id, requested = ids.len(), marked, "Notifications marked seen");
    Ok(Json(DataResponse {
        data: MarkSeenResult { marked },
    }))
}

/// POST /api/v1/notifications
pub async fn publish(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateNotification>,
) -> AppResult<(StatusCode, Json<DataResponse<CreatedNotification>>)> {
    if input.title.trim().is_empty() {
        return Err(CoreError::Validation("Notification title is required".into()).into());
    }
    let id = NotificationRepo::create(&state.pool, &input).await?;
    tracing::info!(notification_id = id, user_id = user.user_id, "Notification published");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedNotification { id },
        }),
    ))
}
