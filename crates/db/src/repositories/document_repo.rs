//! Repository for the `documents` table.

use sqlx::{PgConnection, PgPool};
use doctrack_core::import::NewDocument;
use doctrack_core::types::DbId;

use crate::models::document::{Document, DocumentChanges};

/// Column list shared across queries. Expects `d` = documents joined with
/// `pd` = project_disciplines, `di` = disciplines, `dt` = document_types.
const COLUMNS: &str = "d.id, d.project_id, d.project_discipline_id, pd.discipline_id, \
    di.code AS discipline_code, d.document_type_id, dt.code AS document_type_code, \
    d.site, d.installation, d.sequence_number, d.description, d.file_extension, \
    d.internal_hours, d.external_hours, d.estimated_hours, d.sheet_format, d.sheet_count, \
    d.action_type, d.base_date, d.planned_issue_date, d.sub_project, d.base_code, \
    d.filename, d.state, d.emission_code, d.issued_code, d.created_at, d.updated_at";

const FROM: &str = "documents d \
    JOIN project_disciplines pd ON pd.id = d.project_discipline_id \
    JOIN disciplines di ON di.id = pd.discipline_id \
    JOIN document_types dt ON dt.id = d.document_type_id";

/// Guard for writes that are only allowed before emission. Blank markers
/// count as unset.
const NOT_EMITTED: &str =
    "NULLIF(TRIM(emission_code), '') IS NULL AND NULLIF(TRIM(issued_code), '') IS NULL";

pub struct DocumentRepo;

impl DocumentRepo {
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Document>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM {FROM} WHERE d.id = $1");
        sqlx::query_as::<_, Document>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a project's documents ordered by discipline code then sequence.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Document>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM {FROM} WHERE d.project_id = $1 \
             ORDER BY di.code, d.sequence_number, d.id"
        );
        sqlx::query_as::<_, Document>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Every base code stored for the project.
    pub async fn base_codes(pool: &PgPool, project_id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT base_code FROM documents WHERE project_id = $1")
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Insert all `documents` with a single statement.
    ///
    /// Dates arrive as text and are cast by the database; a value it cannot
    /// read fails the whole statement.
    pub async fn insert_batch(
        conn: &mut PgConnection,
        project_id: DbId,
        documents: &[NewDocument],
    ) -> Result<u64, sqlx::Error> {
        if documents.is_empty() {
            return Ok(0);
        }

        let links: Vec<DbId> = documents.iter().map(|d| d.project_discipline_id).collect();
        let types: Vec<DbId> = documents.iter().map(|d| d.document_type_id).collect();
        let sites: Vec<String> = documents.iter().map(|d| d.site.clone()).collect();
        let installations: Vec<String> = documents.iter().map(|d| d.installation.clone()).collect();
        let sequences: Vec<i32> = documents.iter().map(|d| d.sequence_number).collect();
        let descriptions: Vec<Option<String>> = documents.iter().map(|d| d.description.clone()).collect();
        let extensions: Vec<String> = documents.iter().map(|d| d.file_extension.clone()).collect();
        let internal: Vec<Option<i32>> = documents.iter().map(|d| d.internal_hours).collect();
        let external: Vec<Option<i32>> = documents.iter().map(|d| d.external_hours).collect();
        let estimated: Vec<i32> = documents.iter().map(|d| d.estimated_hours).collect();
        let formats: Vec<Option<String>> = documents.iter().map(|d| d.sheet_format.clone()).collect();
        let sheets: Vec<Option<i32>> = documents.iter().map(|d| d.sheet_count).collect();
        let actions: Vec<String> = documents.iter().map(|d| d.action_type.as_str().to_string()).collect();
        let base_dates: Vec<Option<String>> = documents.iter().map(|d| d.base_date.clone()).collect();
        let issue_dates: Vec<Option<String>> = documents.iter().map(|d| d.planned_issue_date.clone()).collect();
        let sub_projects: Vec<Option<i32>> = documents.iter().map(|d| d.sub_project).collect();
        let base_codes: Vec<String> = documents.iter().map(|d| d.base_code.clone()).collect();
        let filenames: Vec<String> = documents.iter().map(|d| d.filename.clone()).collect();
        let states: Vec<String> = documents.iter().map(|d| d.state.clone()).collect();

        let result = sqlx::query(
            "INSERT INTO documents \
                (project_id, project_discipline_id, document_type_id, site, installation, \
                 sequence_number, description, file_extension, internal_hours, external_hours, \
                 estimated_hours, sheet_format, sheet_count, action_type, base_date, \
                 planned_issue_date, sub_project, base_code, filename, state) \
             SELECT $1, u.link, u.doc_type, u.site, u.installation, u.seq, u.description, \
                    u.ext, u.internal, u.external, u.estimated, u.format, u.sheets, u.action, \
                    u.base_date::date, u.issue_date::date, u.sub_project, u.base_code, \
                    u.filename, u.state \
             FROM UNNEST($2::bigint[], $3::bigint[], $4::text[], $5::text[], $6::int4[], \
                         $7::text[], $8::text[], $9::int4[], $10::int4[], $11::int4[], \
                         $12::text[], $13::int4[], $14::text[], $15::text[], $16::text[], \
                         $17::int4[], $18::text[], $19::text[], $20::text[]) \
                AS u(link, doc_type, site, installation, seq, description, ext, internal, \
                     external, estimated, format, sheets, action, base_date, issue_date, \
                     sub_project, base_code, filename, state)",
        )
        .bind(project_id)
        .bind(&links)
        .bind(&types)
        .bind(&sites)
        .bind(&installations)
        .bind(&sequences)
        .bind(&descriptions)
        .bind(&extensions)
        .bind(&internal)
        .bind(&external)
        .bind(&estimated)
        .bind(&formats)
        .bind(&sheets)
        .bind(&actions)
        .bind(&base_dates)
        .bind(&issue_dates)
        .bind(&sub_projects)
        .bind(&base_codes)
        .bind(&filenames)
        .bind(&states)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Replace a document's editable fields.
    ///
    /// Returns `None` if no row with the given `id` exists or the document
    /// has been emitted.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        changes: &DocumentChanges,
    ) -> Result<Option<Document>, sqlx::Error> {
        let f = &changes.fields;
        let query = format!(
            "UPDATE documents SET \
                project_discipline_id = $2, document_type_id = $3, site = $4, \
                installation = $5, sequence_number = $6, description = $7, \
                file_extension = $8, internal_hours = $9, external_hours = $10, \
                estimated_hours = $11, sheet_format = $12, sheet_count = $13, \
                action_type = $14, base_date = $15, planned_issue_date = $16, \
                sub_project = $17, base_code = $18, filename = $19, updated_at = NOW() \
             WHERE id = $1 AND {NOT_EMITTED}"
        );
        let result = sqlx::query(&query)
            .bind(id)
            .bind(changes.project_discipline_id)
            .bind(f.document_type_id)
            .bind(f.site.trim())
            .bind(f.installation.trim())
            .bind(f.sequence_number)
            .bind(f.description.as_deref().map(str::trim))
            .bind(f.file_extension.trim())
            .bind(f.internal_hours)
            .bind(f.external_hours)
            .bind(changes.estimated_hours)
            .bind(f.sheet_format.as_deref().map(str::trim))
            .bind(f.sheet_count)
            .bind(f.action_type.as_str())
            .bind(f.base_date)
            .bind(f.planned_issue_date)
            .bind(f.sub_project)
            .bind(&changes.base_code)
            .bind(&changes.filename)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Self::find_by_id(pool, id).await
    }

    /// Set the emission markers. Returns `true` if a row was updated.
    pub async fn set_emission(
        pool: &PgPool,
        id: DbId,
        emission_code: Option<&str>,
        issued_code: Option<&str>,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE documents SET emission_code = $2, issued_code = $3, updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(id)
        .bind(emission_code)
        .bind(issued_code)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a document that has not been emitted. Returns
    /// `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let query = format!("DELETE FROM documents WHERE id = $1 AND {NOT_EMITTED}");
        let result = sqlx::query(&query)
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
