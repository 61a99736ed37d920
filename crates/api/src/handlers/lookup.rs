//! Read-only lookup lists used by forms and imports.

use axum::extract::State;
use axum::Json;
use doctrack_db::models::client::Client;
use doctrack_db::models::lookup::{Discipline, DocumentType};
use doctrack_db::repositories::{ClientRepo, DisciplineRepo, DocumentTypeRepo};

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/disciplines
pub async fn disciplines(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Discipline>>>> {
    let data = DisciplineRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/document-types
pub async fn document_types(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<DocumentType>>>> {
    let data = DocumentTypeRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/clients
pub async fn clients(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Client>>>> {
    let data = ClientRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data }))
}
