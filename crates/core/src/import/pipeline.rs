//! Import orchestration: read, validate, de-duplicate, persist.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use crate::document::STATE_LOADED;
use crate::spreadsheet::header::validate_headers;
use crate::spreadsheet::reader::read_first_sheet;
use crate::spreadsheet::row::{is_blank_row, parse_row, LookupTable, ParsedRow, RowContext};
use crate::spreadsheet::{CellValue, SpreadsheetError};
use crate::types::DbId;

use super::duplicate::{check_existing, normalized_set, DuplicateGuard};
use super::store::{ImportStore, NewDocument};
use super::ImportError;

/// The project being imported into.
#[derive(Debug, Clone)]
pub struct ImportProject {
    pub id: DbId,
    pub client_project_code: Option<String>,
    pub internal_project_code: Option<i64>,
}

/// Outcome of a successful import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub inserted: u64,
    /// Imports never update existing documents; always 0.
    pub updated: u64,
    /// Discipline-of-project links created for this import.
    pub disciplines_linked: usize,
}

/// Import the first worksheet of `bytes` into `project`.
///
/// Nothing is written unless every row validates and no base code collides
/// with another row or with a stored document.
pub async fn import_documents(
    store: &dyn ImportStore,
    project: &ImportProject,
    bytes: &[u8],
) -> Result<ImportSummary, ImportError> {
    let rows = read_first_sheet(bytes)?;
    let (header, data) = rows.split_first().ok_or(SpreadsheetError::Empty)?;
    validate_headers(header)?;

    let internal_project_code = project
        .internal_project_code
        .ok_or(ImportError::ProjectIncomplete("internal_project_code"))?;
    let client_project_code = project
        .client_project_code
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or(ImportError::ProjectIncomplete("client_project_code"))?;

    let (disciplines, document_types, links) = tokio::try_join!(
        store.disciplines(),
        store.document_types(),
        store.project_disciplines(project.id),
    )?;
    let disciplines = LookupTable::new(disciplines.into_iter().map(|e| (e.code, e.id)));
    let document_types = LookupTable::new(document_types.into_iter().map(|e| (e.code, e.id)));

    let ctx = RowContext {
        client_project_code,
        internal_project_code,
        disciplines: &disciplines,
        document_types: &document_types,
    };
    let parsed = parse_data_rows(data, &ctx)?;

    if parsed.is_empty() {
        tracing::info!(project_id = project.id, "Import contained no data rows");
        return Ok(ImportSummary::default());
    }

    let existing = normalized_set(store.base_codes(project.id).await?);
    check_existing(&existing, parsed.iter().map(|r| (r.row, r.base_code.as_str())))?;

    let linked: HashSet<DbId> = links.iter().map(|l| l.discipline_id).collect();
    let mut missing: Vec<DbId> = Vec::new();
    for row in &parsed {
        if !linked.contains(&row.discipline_id) && !missing.contains(&row.discipline_id) {
            missing.push(row.discipline_id);
        }
    }

    let mut tx = store.begin().await?;
    let links = if missing.is_empty() {
        links
    } else {
        tx.link_disciplines(project.id, &missing).await?
    };
    let link_by_discipline: HashMap<DbId, DbId> =
        links.iter().map(|l| (l.discipline_id, l.id)).collect();

    let documents = parsed
        .iter()
        .map(|row| {
            let link = link_by_discipline.get(&row.discipline_id).copied().ok_or_else(|| {
                ImportError::Persistence(format!(
                    "Could not resolve the project discipline for \"{}\"",
                    row.discipline_code
                ))
            })?;
            Ok(new_document(row, link))
        })
        .collect::<Result<Vec<_>, ImportError>>()?;

    let inserted = tx.insert_documents(project.id, &documents).await?;
    tx.commit().await?;

    tracing::info!(
        project_id = project.id,
        inserted,
        disciplines_linked = missing.len(),
        "Documents imported"
    );

    Ok(ImportSummary {
        inserted,
        updated: 0,
        disciplines_linked: missing.len(),
    })
}

/// Parse every non-blank data row, rejecting repeated base codes.
///
/// `data[0]` is spreadsheet row 2.
fn parse_data_rows(data: &[Vec<CellValue>], ctx: &RowContext<'_>) -> Result<Vec<ParsedRow>, ImportError> {
    let mut guard = DuplicateGuard::new();
    let mut parsed = Vec::new();
    for (index, cells) in data.iter().enumerate() {
        if is_blank_row(cells) {
            continue;
        }
        let row = parse_row(index + 2, cells, ctx)?;
        guard.check(row.row, &row.base_code)?;
        parsed.push(row);
    }
    Ok(parsed)
}

fn new_document(row: &ParsedRow, project_discipline_id: DbId) -> NewDocument {
    NewDocument {
        project_discipline_id,
        document_type_id: row.document_type_id,
        site: row.site.clone(),
        installation: row.installation.clone(),
        sequence_number: row.sequence_number,
        description: row.description.clone(),
        file_extension: row.file_extension.clone(),
        internal_hours: row.internal_hours,
        external_hours: row.external_hours,
        estimated_hours: row.estimated_hours,
        sheet_format: row.sheet_format.clone(),
        sheet_count: row.sheet_count,
        action_type: row.action_type,
        base_date: row.base_date.clone(),
        planned_issue_date: row.planned_issue_date.clone(),
        sub_project: row.sub_project,
        base_code: row.base_code.clone(),
        filename: row.filename.clone(),
        state: STATE_LOADED.to_string(),
    }
}
