pub mod attachment;
pub mod document;
pub mod lookup;
pub mod notification;
pub mod progress_rule;
pub mod project;
pub mod spreadsheet;

use axum::extract::Multipart;
use axum::http::HeaderValue;
use doctrack_core::error::CoreError;
use doctrack_core::permissions::{Access, DisciplineScope};

use crate::error::{AppError, AppResult};

/// The `file` part of a multipart upload.
pub struct UploadedPart {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// Read the `file` field from a multipart body, ignoring other fields.
pub async fn read_file_field(multipart: &mut Multipart) -> AppResult<UploadedPart> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;
        return Ok(UploadedPart {
            file_name,
            content_type,
            bytes: bytes.to_vec(),
        });
    }
    Err(AppError::BadRequest("Missing required 'file' field".into()))
}

/// `Content-Disposition: attachment` for `filename`, with characters that
/// cannot appear in a quoted ASCII header value replaced by `_`.
pub fn attachment_disposition(filename: &str) -> HeaderValue {
    let safe: String = filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect();
    HeaderValue::from_str(&format!("attachment; filename=\"{safe}\""))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

/// Reject callers whose discipline scope excludes `discipline_code`.
pub fn ensure_can_view(access: &Access, discipline_code: &str) -> AppResult<()> {
    let allowed = match access.discipline_scope() {
        DisciplineScope::All => true,
        DisciplineScope::Only(code) => discipline_code.trim().eq_ignore_ascii_case(&code),
        DisciplineScope::Nothing => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(AppError::Core(CoreError::Forbidden(
            "Document belongs to another discipline".into(),
        )))
    }
}
