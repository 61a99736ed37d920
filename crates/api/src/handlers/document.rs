//! Handlers for single documents: edit and delete.
//!
//! Both are refused once a document has been emitted.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use doctrack_core::document::{
    build_base_code, build_filename, check_field_lengths, ensure_editable, estimated_hours,
    BaseCodeParts, DocumentText, MAX_CODE_LEN,
};
use doctrack_core::error::CoreError;
use doctrack_core::types::DbId;
use doctrack_db::models::document::{Document, DocumentChanges, UpdateDocument};
use doctrack_db::repositories::{
    DisciplineRepo, DocumentRepo, DocumentTypeRepo, ProjectDisciplineRepo,
};
use doctrack_db::DbPool;

use super::project::find_project;
use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireDocumentManager;
use crate::response::DataResponse;
use crate::state::AppState;

/// Load a document or fail with 404.
pub(crate) async fn find_document(pool: &DbPool, id: DbId) -> AppResult<Document> {
    DocumentRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Document",
            id,
        }))
}

/// Error for a guarded write that touched no row: the document was either
/// emitted after the editability check or removed meanwhile.
async fn refused_write(pool: &DbPool, id: DbId) -> AppError {
    match DocumentRepo::find_by_id(pool, id).await {
        Ok(Some(current)) => ensure_editable(
            current.emission_code.as_deref(),
            current.issued_code.as_deref(),
        )
        .err()
        .unwrap_or_else(|| CoreError::Conflict(format!("Document {id} changed concurrently")))
        .into(),
        Ok(None) => CoreError::NotFound {
            entity: "Document",
            id,
        }
        .into(),
        Err(e) => e.into(),
    }
}

/// PUT /api/v1/documents/{id}
///
/// Replaces the editable fields, rebuilds the base code and filename, and
/// links the discipline to the project if needed. A code that collides with
/// another document of the project is rejected with 409.
pub async fn update(
    RequireDocumentManager(user): RequireDocumentManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDocument>,
) -> AppResult<Json<DataResponse<Document>>> {
    let existing = find_document(&state.pool, id).await?;
    ensure_editable(existing.emission_code.as_deref(), existing.issued_code.as_deref())?;
    let project = find_project(&state.pool, existing.project_id).await?;

    let discipline = DisciplineRepo::find_by_id(&state.pool, input.discipline_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!("Discipline {} does not exist", input.discipline_id))
        })?;
    let document_type = DocumentTypeRepo::find_by_id(&state.pool, input.document_type_id)
        .await?
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "Document type {} does not exist",
                input.document_type_id
            ))
        })?;

    check_field_lengths(&DocumentText {
        site: input.site.trim(),
        installation: input.installation.trim(),
        discipline_code: &discipline.code,
        document_type_code: &document_type.code,
        sheet_format: input.sheet_format.as_deref().map(str::trim),
        file_extension: Some(input.file_extension.trim()),
        description: input.description.as_deref().map(str::trim),
    })
    .map_err(CoreError::from)?;
    let estimated = estimated_hours(input.internal_hours, input.external_hours).ok_or_else(|| {
        CoreError::Validation("Internal plus external hours exceed the supported range".into())
    })?;

    let base_code = build_base_code(&BaseCodeParts {
        site: &input.site,
        installation: &input.installation,
        client_project_code: project.client_project_code.as_deref().unwrap_or(""),
        discipline_code: &discipline.code,
        document_type_code: &document_type.code,
        sequence_number: Some(input.sequence_number),
    })
    .map_err(CoreError::from)?;
    let filename = build_filename(&base_code, &input.file_extension).map_err(CoreError::from)?;
    if filename.chars().count() > MAX_CODE_LEN {
        return Err(CoreError::Validation(format!(
            "Filename exceeds {MAX_CODE_LEN} characters"
        ))
        .into());
    }

    let link_id = ProjectDisciplineRepo::ensure(&state.pool, project.id, discipline.id).await?;
    let changes = DocumentChanges {
        project_discipline_id: link_id,
        estimated_hours: estimated,
        base_code,
        filename,
        fields: input,
    };

    let Some(document) = DocumentRepo::update(&state.pool, id, &changes).await? else {
        return Err(refused_write(&state.pool, id).await);
    };
    tracing::info!(
        document_id = id,
        user_id = user.user_id,
        base_code = %document.base_code,
        "Document updated"
    );
    Ok(Json(DataResponse { data: document }))
}

/// DELETE /api/v1/documents/{id}
pub async fn delete(
    RequireDocumentManager(user): RequireDocumentManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let existing = find_document(&state.pool, id).await?;
    ensure_editable(existing.emission_code.as_deref(), existing.issued_code.as_deref())?;

    if !DocumentRepo::delete(&state.pool, id).await? {
        return Err(refused_write(&state.pool, id).await);
    }
    tracing::info!(document_id = id, user_id = user.user_id, "Document deleted");
    Ok(StatusCode::NO_CONTENT)
}
