use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use doctrack_core::error::CoreError;
use doctrack_core::import::ImportError;
use doctrack_storage::StorageError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain error types and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A spreadsheet import that was rejected or failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    internal()
                }
            },

            // --- Import errors ---
            AppError::Import(err) => classify_import_error(err),

            // --- Storage errors ---
            AppError::Storage(StorageError::NotFound(name)) => (
                StatusCode::NOT_FOUND,
                "FILE_NOT_FOUND",
                format!("No file stored for {name}"),
            ),
            AppError::Storage(err @ StorageError::Backend(_)) => {
                tracing::error!(error = %err, "Storage error");
                (
                    StatusCode::BAD_GATEWAY,
                    "STORAGE_ERROR",
                    "File storage is unavailable".to_string(),
                )
            }

            // --- Database errors ---
            AppError::Database(err) => classify_sqlx_error(err),

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify an import error into an HTTP status, error code, and message.
///
/// - Unreadable files map to 400.
/// - Header, row, reference and project problems map to 422.
/// - Duplicate codes map to 409.
/// - Store failures map to 500 and keep the store's message.
fn classify_import_error(err: &ImportError) -> (StatusCode, &'static str, String) {
    let message = err.to_string();
    match err {
        ImportError::Spreadsheet(_) => (StatusCode::BAD_REQUEST, "INVALID_SPREADSHEET", message),
        ImportError::HeaderMismatch { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "HEADER_MISMATCH", message)
        }
        ImportError::RowValidation { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "ROW_VALIDATION", message)
        }
        ImportError::ReferenceNotFound { .. } => {
            (StatusCode::UNPROCESSABLE_ENTITY, "REFERENCE_NOT_FOUND", message)
        }
        ImportError::ProjectIncomplete(_) => {
            (StatusCode::UNPROCESSABLE_ENTITY, "PROJECT_INCOMPLETE", message)
        }
        e if e.is_duplicate() => (StatusCode::CONFLICT, "DUPLICATE_DOCUMENT", message),
        _ => {
            tracing::error!(error = %message, "Import failed while persisting");
            (StatusCode::INTERNAL_SERVER_ERROR, "IMPORT_FAILED", message)
        }
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            internal()
        }
        other => {
            tracing::error!(error = %other, "Database error");
            internal()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: ImportError) -> (StatusCode, &'static str) {
        let (status, code, _) = classify_import_error(&err);
        (status, code)
    }

    #[test]
    fn import_errors_map_to_statuses() {
        assert_eq!(
            status(ImportError::DuplicateExisting { row: 2, code: "X".into() }),
            (StatusCode::CONFLICT, "DUPLICATE_DOCUMENT")
        );
        assert_eq!(
            status(ImportError::DuplicateOnCommit("uq_documents_project_base_code".into())),
            (StatusCode::CONFLICT, "DUPLICATE_DOCUMENT")
        );
        assert_eq!(
            status(ImportError::ProjectIncomplete("client_project_code")),
            (StatusCode::UNPROCESSABLE_ENTITY, "PROJECT_INCOMPLETE")
        );
        assert_eq!(
            status(ImportError::Persistence("boom".into())),
            (StatusCode::INTERNAL_SERVER_ERROR, "IMPORT_FAILED")
        );
    }

    #[test]
    fn persistence_message_is_kept() {
        let (_, _, message) = classify_import_error(&ImportError::Persistence(
            "invalid input syntax for type date".into(),
        ));
        assert_eq!(message, "invalid input syntax for type date");
    }
}
