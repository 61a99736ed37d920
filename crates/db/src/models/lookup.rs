//! Discipline and document-type lookup rows.
//!
//! Both tables share the same shape: a short unique code plus a description.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use doctrack_core::types::DbId;

/// A row from `disciplines`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Discipline {
    pub id: DbId,
    pub code: String,
    pub description: Option<String>,
}

/// A row from `document_types`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentType {
    pub id: DbId,
    pub code: String,
    pub description: Option<String>,
}

/// DTO for creating either lookup row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateLookup {
    pub code: String,
    pub description: Option<String>,
}
