//! Spreadsheet import and export for a project's documents.

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::Json;
use doctrack_core::export::{export_filename, render_export, ExportDocument, ExportProject, XLSX_CONTENT_TYPE};
use doctrack_core::import::{import_documents, ImportProject, ImportSummary};
use doctrack_core::types::DbId;
use doctrack_db::repositories::DocumentRepo;
use doctrack_db::PgImportStore;

use super::project::find_project;
use super::{attachment_disposition, read_file_field};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireDocumentManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/projects/{id}/documents/import
///
/// Accepts a multipart body with a `file` field holding an `.xlsx`
/// workbook. Either every row is stored or none is.
pub async fn import(
    RequireDocumentManager(user): RequireDocumentManager,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportSummary>>> {
    let project = find_project(&state.pool, project_id).await?;
    let upload = read_file_field(&mut multipart).await?;
    tracing::debug!(
        project_id,
        user_id = user.user_id,
        file_name = ?upload.file_name,
        size = upload.bytes.len(),
        "Spreadsheet received"
    );

    let store = PgImportStore::new(state.pool.clone());
    let target = ImportProject {
        id: project.id,
        client_project_code: project.client_project_code,
        internal_project_code: project.internal_project_code,
    };
    let summary = import_documents(&store, &target, &upload.bytes).await?;
    Ok(Json(DataResponse { data: summary }))
}

/// GET /api/v1/projects/{id}/documents/export
///
/// Streams an `.xlsx` with the documents the caller can see, sorted by
/// discipline code and sequence number.
pub async fn export(
    user: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = find_project(&state.pool, project_id).await?;
    let documents = DocumentRepo::list_by_project(&state.pool, project_id).await?;
    let visible = user
        .access
        .filter_by_discipline(documents, |d| Some(d.discipline_code.as_str()));
    let count = visible.len();
    let rows: Vec<ExportDocument> = visible.iter().map(ExportDocument::from).collect();

    let bytes = render_export(
        &ExportProject {
            name: &project.name,
            client_project_code: project.client_project_code.as_deref(),
            internal_project_code: project.internal_project_code,
        },
        rows,
    )
    .map_err(|e| AppError::InternalError(format!("Failed to render export: {e}")))?;

    let filename = export_filename(&project.name, chrono::Utc::now().date_naive());
    tracing::info!(project_id, documents = count, %filename, "Documents exported");

    Ok((
        [
            (CONTENT_TYPE, HeaderValue::from_static(XLSX_CONTENT_TYPE)),
            (CONTENT_DISPOSITION, attachment_disposition(&filename)),
        ],
        bytes,
    ))
}
