//! Document model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use doctrack_core::document::ActionType;
use doctrack_core::export::ExportDocument;
use doctrack_core::types::{DbId, Timestamp};

/// A document row joined with its discipline and document-type codes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Document {
    pub id: DbId,
    pub project_id: DbId,
    pub project_discipline_id: DbId,
    pub discipline_id: DbId,
    pub discipline_code: String,
    pub document_type_id: DbId,
    pub document_type_code: String,
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
    pub action_type: String,
    pub base_date: Option<NaiveDate>,
    pub planned_issue_date: Option<NaiveDate>,
    pub sub_project: Option<i32>,
    pub base_code: String,
    pub filename: String,
    pub state: String,
    pub emission_code: Option<String>,
    pub issued_code: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Document {
    pub fn is_emitted(&self) -> bool {
        doctrack_core::document::is_emitted(self.emission_code.as_deref(), self.issued_code.as_deref())
    }
}

impl From<&Document> for ExportDocument {
    fn from(doc: &Document) -> Self {
        ExportDocument {
            site: Some(doc.site.clone()),
            installation: Some(doc.installation.clone()),
            discipline_code: Some(doc.discipline_code.clone()),
            document_type_code: Some(doc.document_type_code.clone()),
            sequence_number: Some(doc.sequence_number),
            description: doc.description.clone(),
            file_extension: Some(doc.file_extension.clone()),
            internal_hours: doc.internal_hours,
            external_hours: doc.external_hours,
            sheet_format: doc.sheet_format.clone(),
            sheet_count: doc.sheet_count,
            action_type: ActionType::parse(&doc.action_type),
            base_date: doc.base_date,
            planned_issue_date: doc.planned_issue_date,
            sub_project: doc.sub_project,
        }
    }
}

/// Editable document fields, as submitted by a client.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateDocument {
    pub site: String,
    pub installation: String,
    pub discipline_id: DbId,
    pub document_type_id: DbId,
    pub sequence_number: i32,
    pub description: Option<String>,
    pub file_extension: String,
    pub internal_hours: Option<i32>,
    pub external_hours: Option<i32>,
    pub sheet_format: Option<String>,
    pub sheet_count: Option<i32>,
    pub action_type: ActionType,
    pub base_date: Option<NaiveDate>,
    pub planned_issue_date: Option<NaiveDate>,
    pub sub_project: Option<i32>,
}

/// A full document update with derived fields already computed.
#[derive(Debug, Clone)]
pub struct DocumentChanges {
    pub project_discipline_id: DbId,
    pub fields: UpdateDocument,
    pub estimated_hours: i32,
    pub base_code: String,
    pub filename: String,
}
