use axum::routing::get;
use axum::Router;

use crate::handlers::lookup;
use crate::state::AppState;

/// Lookup lists, merged at the `/api/v1` root.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/disciplines", get(lookup::disciplines))
        .route("/document-types", get(lookup::document_types))
        .route("/clients", get(lookup::clients))
}
