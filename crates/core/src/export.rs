//! Export of a project's documents into the import spreadsheet layout.
//!
//! The exported file uses exactly the columns the importer expects, so a
//! downloaded sheet can be edited and uploaded again.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::document::ActionType;
use crate::spreadsheet::writer::render_workbook;
use crate::spreadsheet::{col, CellValue, SpreadsheetError, COLUMN_COUNT};

/// MIME type of generated workbooks.
pub const XLSX_CONTENT_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]+"#).expect("valid regex"));

/// Project values injected into every exported row.
#[derive(Debug, Clone, Copy)]
pub struct ExportProject<'a> {
    pub name: &'a str,
    pub client_project_code: Option<&'a str>,
    pub internal_project_code: Option<i64>,
}

/// One stored document with its discipline and document-type codes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExportDocument {
    pub site: Option<String>,
    pub installation: Option<String>,
    pub discipline_code: Option<String>,
    pub document_type_code: Option<String>,
    pub sequence_number: Option<i32>,
    pub description: Option<String>,
    pub file_extension: Option<String>,
    pub internal_hours: Option<i32>,
    pub external_hours: Option<i32>,
    pub sheet_format: Option<String>,
    pub sheet_count: Option<i32>,
    pub action_type: Option<ActionType>,
    pub base_date: Option<NaiveDate>,
    pub planned_issue_date: Option<NaiveDate>,
    pub sub_project: Option<i32>,
}

/// Sort by discipline code, then by sequence number (missing counts as 0).
pub fn sort_for_export(documents: &mut [ExportDocument]) {
    documents.sort_by(|a, b| {
        let da = a.discipline_code.as_deref().unwrap_or("");
        let db = b.discipline_code.as_deref().unwrap_or("");
        da.cmp(db)
            .then_with(|| a.sequence_number.unwrap_or(0).cmp(&b.sequence_number.unwrap_or(0)))
    });
}

fn text(value: &Option<String>) -> CellValue {
    value.as_deref().map_or(CellValue::Empty, CellValue::text)
}

fn int(value: Option<i32>) -> CellValue {
    value.map_or(CellValue::Empty, |n| CellValue::Number(f64::from(n)))
}

fn date(value: Option<NaiveDate>) -> CellValue {
    value.map_or(CellValue::Empty, CellValue::Date)
}

/// Lay out one document as the 17 spreadsheet columns.
pub fn export_row(project: &ExportProject<'_>, doc: &ExportDocument) -> Vec<CellValue> {
    let mut cells = vec![CellValue::Empty; COLUMN_COUNT];
    cells[col::SITE] = text(&doc.site);
    cells[col::INSTALLATION] = text(&doc.installation);
    cells[col::DISCIPLINE] = text(&doc.discipline_code);
    cells[col::DOCUMENT_TYPE] = text(&doc.document_type_code);
    cells[col::SEQUENCE_NUMBER] = int(doc.sequence_number);
    cells[col::DESCRIPTION] = text(&doc.description);
    cells[col::FILE_EXTENSION] = text(&doc.file_extension);
    cells[col::INTERNAL_HOURS] = int(doc.internal_hours);
    cells[col::EXTERNAL_HOURS] = int(doc.external_hours);
    cells[col::SHEET_FORMAT] = text(&doc.sheet_format);
    cells[col::SHEET_COUNT] = int(doc.sheet_count);
    cells[col::ACTION_TYPE] = doc
        .action_type
        .map_or(CellValue::Empty, |a| CellValue::Number(a.column_value() as f64));
    cells[col::BASE_DATE] = date(doc.base_date);
    cells[col::PLANNED_ISSUE_DATE] = date(doc.planned_issue_date);
    cells[col::CLIENT_CODE] = project
        .client_project_code
        .map_or(CellValue::Empty, CellValue::text);
    cells[col::PROJECT_CODE] = project
        .internal_project_code
        .map_or(CellValue::Empty, |n| CellValue::Number(n as f64));
    cells[col::SUB_PROJECT] = int(doc.sub_project);
    cells
}

/// Sort `documents` and render them into an `.xlsx` buffer.
pub fn render_export(
    project: &ExportProject<'_>,
    mut documents: Vec<ExportDocument>,
) -> Result<Vec<u8>, SpreadsheetError> {
    sort_for_export(&mut documents);
    let rows: Vec<Vec<CellValue>> = documents.iter().map(|d| export_row(project, d)).collect();
    render_workbook(&rows)
}

/// `documentos_<name>_<YYYY-MM-DD>.xlsx`, with characters that are unsafe in
/// file names collapsed to `-`.
pub fn export_filename(project_name: &str, date: NaiveDate) -> String {
    let trimmed = project_name.trim();
    let name = if trimmed.is_empty() { "proyecto" } else { trimmed };
    let safe = UNSAFE_FILENAME_CHARS.replace_all(name, "-");
    format!("documentos_{safe}_{}.xlsx", date.format("%Y-%m-%d"))
}
