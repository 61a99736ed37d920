use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// Bucket attachments are stored in.
    pub bucket: String,
}

/// GET /health
///
/// 200 when the database answers, 503 otherwise. Blob storage is not checked.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let db_healthy = match doctrack_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Health check: database unreachable");
            false
        }
    };
    let (code, status) = if db_healthy {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    (
        code,
        Json(HealthReport {
            status,
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
            bucket: state.config.storage.bucket.clone(),
        }),
    )
}

/// Root-level routes, outside `/api/v1`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
