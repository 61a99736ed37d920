//! Persistence port for the import pipeline.
//!
//! The pipeline only talks to these traits; `doctrack-db` provides the
//! PostgreSQL implementation and tests use an in-memory one.

use async_trait::async_trait;
use serde::Serialize;

use crate::document::ActionType;
use crate::types::DbId;

/// Failure reported by a store implementation.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. Carries the constraint name.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("{0}")]
    Backend(String),
}

/// A lookup row (`disciplines`, `document_types`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupEntry {
    pub id: DbId,
    pub code: String,
}

/// A discipline-of-project link together with its discipline code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisciplineLink {
    pub id: DbId,
    pub discipline_id: DbId,
    pub discipline_code: String,
}

/// A document ready to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDocument {
    pub project_discipline_id: DbId,
    pub document_type_id: DbId,
    pub site: String,
    pub installation: String,
    pub sequence_number: i32,
    pub description: Option<String>,
    pub file_extension: String,
    pub internal_hours: Option<i32>,
    pub external_hours: Option<i32>,
    pub estimated_hours: i32,
    pub sheet_format: Option<String>,
    pub sheet_count: Option<i32>,
    pub action_type: ActionType,
    /// ISO date or unrecognized text cast by the database.
    pub base_date: Option<String>,
    pub planned_issue_date: Option<String>,
    pub sub_project: Option<i32>,
    pub base_code: String,
    pub filename: String,
    pub state: String,
}

/// Read side of the import store.
#[async_trait]
pub trait ImportStore: Send + Sync {
    async fn disciplines(&self) -> Result<Vec<LookupEntry>, StoreError>;

    async fn document_types(&self) -> Result<Vec<LookupEntry>, StoreError>;

    async fn project_disciplines(&self, project_id: DbId) -> Result<Vec<DisciplineLink>, StoreError>;

    /// Every stored base code of the project, as stored.
    async fn base_codes(&self, project_id: DbId) -> Result<Vec<String>, StoreError>;

    /// Open the write transaction. Dropping it without `commit` rolls back.
    async fn begin(&self) -> Result<Box<dyn ImportTransaction>, StoreError>;
}

/// Write side of the import store, scoped to one transaction.
#[async_trait]
pub trait ImportTransaction: Send {
    /// Create links for `discipline_ids` that do not exist yet and return all
    /// of the project's links afterwards.
    async fn link_disciplines(
        &mut self,
        project_id: DbId,
        discipline_ids: &[DbId],
    ) -> Result<Vec<DisciplineLink>, StoreError>;

    /// Insert all documents; returns the number of rows written.
    async fn insert_documents(&mut self, project_id: DbId, documents: &[NewDocument]) -> Result<u64, StoreError>;

    async fn commit(self: Box<Self>) -> Result<(), StoreError>;
}
