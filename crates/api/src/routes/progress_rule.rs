use axum::routing::get;
use axum::Router;

use crate::handlers::progress_rule;
use crate::state::AppState;

/// Routes mounted at `/progress-rules`.
///
/// ```text
/// GET    /    -> list
/// POST   /    -> create (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(progress_rule::list).post(progress_rule::create))
}
