//! Route definitions for the `/projects` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{project, spreadsheet};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                          -> list
/// POST   /                          -> create
/// GET    /{id}                      -> get_by_id
/// PUT    /{id}                      -> update
/// GET    /{id}/disciplines          -> list_disciplines
/// GET    /{id}/documents            -> list_documents
/// POST   /{id}/documents/import     -> spreadsheet::import
/// GET    /{id}/documents/export     -> spreadsheet::export
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list).post(project::create))
        .route("/{id}", get(project::get_by_id).put(project::update))
        .route("/{id}/disciplines", get(project::list_disciplines))
        .route("/{id}/documents", get(project::list_documents))
        .route("/{id}/documents/import", post(spreadsheet::import))
        .route("/{id}/documents/export", get(spreadsheet::export))
}
