use axum::routing::{get, post};
use axum::Router;

use crate::handlers::notification;
use crate::state::AppState;

/// Routes mounted at `/notifications`.
///
/// ```text
/// GET    /        -> list (?limit=)
/// POST   /        -> publish (admin)
/// POST   /seen    -> mark_seen
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notification::list).post(notification::publish))
        .route("/seen", post(notification::mark_seen))
}
