//! Handlers for the file attached to a document.
//!
//! Files are stored under the document's filename; uploading again replaces
//! the stored object.

use axum::extract::{Multipart, Path, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::HeaderValue;
use axum::response::IntoResponse;
use axum::Json;
use doctrack_core::document::{check_upload_extension, ensure_editable};
use doctrack_core::error::CoreError;
use doctrack_core::types::DbId;
use serde::Serialize;

use super::document::find_document;
use super::{attachment_disposition, ensure_can_view, read_file_field};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireDocumentManager;
use crate::response::DataResponse;
use crate::state::AppState;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Serialize)]
pub struct FileStatus {
    pub filename: String,
    pub exists: bool,
}

#[derive(Debug, Serialize)]
pub struct StoredFile {
    pub filename: String,
    pub size: usize,
}

/// GET /api/v1/documents/{id}/file/exists
pub async fn exists(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<FileStatus>>> {
    let document = find_document(&state.pool, id).await?;
    ensure_can_view(&user.access, &document.discipline_code)?;
    let exists = state.blobs.exists(&document.filename).await?;
    Ok(Json(DataResponse {
        data: FileStatus {
            filename: document.filename,
            exists,
        },
    }))
}

/// GET /api/v1/documents/{id}/file
pub async fn download(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = find_document(&state.pool, id).await?;
    ensure_can_view(&user.access, &document.discipline_code)?;
    let blob = state.blobs.download(&document.filename).await?;

    let content_type = blob
        .content_type
        .as_deref()
        .and_then(|ct| HeaderValue::from_str(ct).ok())
        .unwrap_or_else(|| HeaderValue::from_static(OCTET_STREAM));
    Ok((
        [
            (CONTENT_TYPE, content_type),
            (CONTENT_DISPOSITION, attachment_disposition(&document.filename)),
        ],
        blob.bytes,
    ))
}

/// PUT /api/v1/documents/{id}/file
///
/// The uploaded file's extension must match the document's file type.
pub async fn upload(
    RequireDocumentManager(user): RequireDocumentManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<StoredFile>>> {
    let document = find_document(&state.pool, id).await?;
    ensure_editable(document.emission_code.as_deref(), document.issued_code.as_deref())?;
    if document.filename.trim().is_empty() {
        return Err(CoreError::Validation("Document has no filename".into()).into());
    }

    let upload = read_file_field(&mut multipart).await?;
    let uploaded_name = upload.file_name.as_deref().unwrap_or("");
    check_upload_extension(Some(&document.file_extension), uploaded_name)?;

    let size = upload.bytes.len();
    let content_type = upload.content_type.as_deref().unwrap_or(OCTET_STREAM);
    state
        .blobs
        .upload(&document.filename, upload.bytes, content_type)
        .await?;

    tracing::info!(
        document_id = id,
        user_id = user.user_id,
        filename = %document.filename,
        size,
        "Document file stored"
    );
    Ok(Json(DataResponse {
        data: StoredFile {
            filename: document.filename,
            size,
        },
    }))
}
