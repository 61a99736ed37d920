pub mod document;
pub mod health;
pub mod lookup;
pub mod notification;
pub mod progress_rule;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                                 list, create
/// /projects/{id}                            get, update (with progress rules)
/// /projects/{id}/disciplines                discipline links
/// /projects/{id}/documents                  documents
/// /projects/{id}/documents/import           spreadsheet import (POST)
/// /projects/{id}/documents/export           spreadsheet export (GET)
///
/// /documents/{id}                           update, delete
/// /documents/{id}/file                      download, upload
/// /documents/{id}/file/exists               existence check
///
/// /disciplines                              lookup
/// /document-types                           lookup
/// /clients                                  lookup
/// /progress-rules                           list, create
///
/// /notifications                            feed, publish
/// /notifications/seen                       mark seen (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/documents", document::router())
        .nest("/notifications", notification::router())
        .nest("/progress-rules", progress_rule::router())
        .merge(lookup::router())
}
