//! Route definitions for the `/documents` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::{attachment, document};
use crate::state::AppState;

/// Routes mounted at `/documents`.
///
/// ```text
/// PUT    /{id}                -> update
/// DELETE /{id}                -> delete
/// GET    /{id}/file           -> attachment::download
/// PUT    /{id}/file           -> attachment::upload
/// GET    /{id}/file/exists    -> attachment::exists
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", put(document::update).delete(document::delete))
        .route("/{id}/file", get(attachment::download).put(attachment::upload))
        .route("/{id}/file/exists", get(attachment::exists))
}
