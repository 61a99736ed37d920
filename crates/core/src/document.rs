//! Document identity rules: base code and filename derivation, action
//! classification, estimated hours, and the emission lock.
//!
//! Pure functions only. Both the spreadsheet importer and the single-document
//! edit path build codes through [`build_base_code`] so the two can never
//! disagree on the format.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Lifecycle state names
// ---------------------------------------------------------------------------

/// State stamped on every document created by a spreadsheet import.
pub const STATE_LOADED: &str = "cargado";

/// Maximum length of a derived base code or filename.
pub const MAX_CODE_LEN: usize = 500;

// ---------------------------------------------------------------------------
// Action classification
// ---------------------------------------------------------------------------

/// Whether a document is reviewed for approval or only sent for information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionType {
    Calificable,
    Informativo,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Calificable => "Calificable",
            Self::Informativo => "Informativo",
        }
    }

    /// Parse the stored representation. Unknown values yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Calificable" => Some(Self::Calificable),
            "Informativo" => Some(Self::Informativo),
            _ => None,
        }
    }

    /// Map the spreadsheet's numeric classifier (`1` / `2`).
    pub fn from_column_value(value: i64) -> Option<Self> {
        match value {
            1 => Some(Self::Calificable),
            2 => Some(Self::Informativo),
            _ => None,
        }
    }

    /// The numeric classifier written back to spreadsheets.
    pub fn column_value(&self) -> i64 {
        match self {
            Self::Calificable => 1,
            Self::Informativo => 2,
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Base code
// ---------------------------------------------------------------------------

/// One of the values a document code is assembled from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeComponent {
    Site,
    Installation,
    ClientProjectCode,
    Discipline,
    DocumentType,
    SequenceNumber,
    FileExtension,
}

impl CodeComponent {
    /// The spreadsheet column that carries this component.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Site => "YACIMIENTO",
            Self::Installation => "INSTALACION",
            Self::ClientProjectCode => "COD CLIENTE",
            Self::Discipline => "DISCIPLINA",
            Self::DocumentType => "TIPO DOC",
            Self::SequenceNumber => "NRO DOC",
            Self::FileExtension => "TIPO ARCHIVO",
        }
    }
}

/// A required code component was blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("\"{}\" is required to build the document code", .0.label())]
pub struct MissingCodeComponent(pub CodeComponent);

impl From<MissingCodeComponent> for CoreError {
    fn from(err: MissingCodeComponent) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// The six values that identify a document within a project.
#[derive(Debug, Clone, Copy)]
pub struct BaseCodeParts<'a> {
    pub site: &'a str,
    pub installation: &'a str,
    pub client_project_code: &'a str,
    pub discipline_code: &'a str,
    pub document_type_code: &'a str,
    pub sequence_number: Option<i32>,
}

/// Return `Err` when `value` is blank once trimmed.
pub fn require_component(value: &str, component: CodeComponent) -> Result<&str, MissingCodeComponent> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(MissingCodeComponent(component))
    } else {
        Ok(trimmed)
    }
}

/// Build `site-installation-client-discipline-doctype-sequence`.
///
/// Components are trimmed; the first blank one (in code order) is reported.
///
/// ```
/// use doctrack_core::document::{build_base_code, BaseCodeParts};
///
/// let code = build_base_code(&BaseCodeParts {
///     site: "LLL",
///     installation: " PTA-1 ",
///     client_project_code: "C100",
///     discipline_code: "ME",
///     document_type_code: "PL",
///     sequence_number: Some(7),
/// })
/// .unwrap();
/// assert_eq!(code, "LLL-PTA-1-C100-ME-PL-7");
/// ```
pub fn build_base_code(parts: &BaseCodeParts<'_>) -> Result<String, MissingCodeComponent> {
    let site = require_component(parts.site, CodeComponent::Site)?;
    let installation = require_component(parts.installation, CodeComponent::Installation)?;
    let client = require_component(parts.client_project_code, CodeComponent::ClientProjectCode)?;
    let discipline = require_component(parts.discipline_code, CodeComponent::Discipline)?;
    let doc_type = require_component(parts.document_type_code, CodeComponent::DocumentType)?;
    let sequence = parts
        .sequence_number
        .ok_or(MissingCodeComponent(CodeComponent::SequenceNumber))?;

    Ok(format!(
        "{site}-{installation}-{client}-{discipline}-{doc_type}-{sequence}"
    ))
}

/// Build `base_code.extension`. The extension is mandatory.
pub fn build_filename(base_code: &str, file_extension: &str) -> Result<String, MissingCodeComponent> {
    let ext = require_component(file_extension, CodeComponent::FileExtension)?;
    Ok(format!("{base_code}.{ext}"))
}

/// Canonical form used for duplicate detection: trimmed, upper-cased, with
/// every whitespace character removed.
pub fn normalize_base_code(code: &str) -> String {
    code.trim()
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

// ---------------------------------------------------------------------------
// Field lengths
// ---------------------------------------------------------------------------

/// The length-limited text fields of a document, already trimmed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentText<'a> {
    pub site: &'a str,
    pub installation: &'a str,
    pub discipline_code: &'a str,
    pub document_type_code: &'a str,
    pub sheet_format: Option<&'a str>,
    pub file_extension: Option<&'a str>,
    pub description: Option<&'a str>,
}

/// A text field is longer than its column allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{field} exceeds {max} characters")]
pub struct FieldTooLong {
    /// Spreadsheet header of the field.
    pub field: &'static str,
    pub max: usize,
}

impl From<FieldTooLong> for CoreError {
    fn from(err: FieldTooLong) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// Check every length-limited field, code components first. Lengths are
/// counted in characters; absent optional fields pass.
pub fn check_field_lengths(text: &DocumentText<'_>) -> Result<(), FieldTooLong> {
    let limits = [
        (CodeComponent::Discipline.label(), Some(text.discipline_code), 2),
        (CodeComponent::DocumentType.label(), Some(text.document_type_code), 2),
        (CodeComponent::Site.label(), Some(text.site), 4),
        (CodeComponent::Installation.label(), Some(text.installation), 20),
        ("FORMATO HOJAS", text.sheet_format, 2),
        (CodeComponent::FileExtension.label(), text.file_extension, 100),
        ("DESCRIPCION", text.description, 500),
    ];
    for (field, value, max) in limits {
        if value.is_some_and(|v| v.chars().count() > max) {
            return Err(FieldTooLong { field, max });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Hours / emission / attachments
// ---------------------------------------------------------------------------

/// `internal + external`, with missing values counted as zero.
///
/// `None` when the sum does not fit the stored column.
pub fn estimated_hours(internal: Option<i32>, external: Option<i32>) -> Option<i32> {
    internal.unwrap_or(0).checked_add(external.unwrap_or(0))
}

/// A document is emitted once it carries either emission marker.
pub fn is_emitted(emission_code: Option<&str>, issued_code: Option<&str>) -> bool {
    let present = |v: Option<&str>| v.is_some_and(|s| !s.trim().is_empty());
    present(emission_code) || present(issued_code)
}

/// Reject changes to an emitted document.
pub fn ensure_editable(emission_code: Option<&str>, issued_code: Option<&str>) -> Result<(), CoreError> {
    if is_emitted(emission_code, issued_code) {
        return Err(CoreError::Conflict(
            "Document has already been emitted and can no longer be modified or deleted".into(),
        ));
    }
    Ok(())
}

/// Lower-case an extension and drop a leading dot (`".PDF"` -> `"pdf"`).
pub fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

/// Check that an uploaded file name carries the document's expected extension.
///
/// Documents without an expected extension accept any file.
pub fn check_upload_extension(expected: Option<&str>, uploaded_name: &str) -> Result<(), CoreError> {
    let expected = expected.map(normalize_extension).unwrap_or_default();
    if expected.is_empty() {
        return Ok(());
    }
    let actual = uploaded_name
        .rsplit_once('.')
        .map(|(_, ext)| normalize_extension(ext))
        .unwrap_or_default();
    if actual != expected {
        let shown = if actual.is_empty() { "?" } else { actual.as_str() };
        return Err(CoreError::Validation(format!(
            "The selected file must be .{expected} (got .{shown})"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn parts() -> BaseCodeParts<'static> {
        BaseCodeParts {
            site: "LLL",
            installation: "PTA1",
            client_project_code: "C100",
            discipline_code: "ME",
            document_type_code: "PL",
            sequence_number: Some(12),
        }
    }

    #[test]
    fn builds_code_and_filename() {
        let code = build_base_code(&parts()).unwrap();
        assert_eq!(code, "LLL-PTA1-C100-ME-PL-12");
        assert_eq!(build_filename(&code, "pdf").unwrap(), "LLL-PTA1-C100-ME-PL-12.pdf");
    }

    #[test]
    fn each_missing_component_is_named() {
        let cases: [(BaseCodeParts<'static>, CodeComponent); 6] = [
            (BaseCodeParts { site: "  ", ..parts() }, CodeComponent::Site),
            (BaseCodeParts { installation: "", ..parts() }, CodeComponent::Installation),
            (BaseCodeParts { client_project_code: "", ..parts() }, CodeComponent::ClientProjectCode),
            (BaseCodeParts { discipline_code: " ", ..parts() }, CodeComponent::Discipline),
            (BaseCodeParts { document_type_code: "", ..parts() }, CodeComponent::DocumentType),
            (BaseCodeParts { sequence_number: None, ..parts() }, CodeComponent::SequenceNumber),
        ];
        for (input, component) in cases {
            assert_matches!(build_base_code(&input), Err(MissingCodeComponent(c)) if c == component);
        }
    }

    #[test]
    fn filename_requires_extension() {
        assert_matches!(
            build_filename("X", "  "),
            Err(MissingCodeComponent(CodeComponent::FileExtension))
        );
    }

    #[test]
    fn normalization_ignores_case_and_whitespace() {
        assert_eq!(normalize_base_code(" lll-pta 1-c100 "), "LLL-PTA1-C100");
        assert_eq!(
            normalize_base_code("LLL-PTA1-C100-ME-PL-1"),
            normalize_base_code("lll-pta1-c100-me-pl-1")
        );
    }

    #[test]
    fn estimated_hours_treats_null_as_zero() {
        assert_eq!(estimated_hours(Some(10), Some(5)), Some(15));
        assert_eq!(estimated_hours(None, Some(5)), Some(5));
        assert_eq!(estimated_hours(None, None), Some(0));
    }

    #[test]
    fn estimated_hours_overflow_is_reported() {
        assert_eq!(estimated_hours(Some(i32::MAX), None), Some(i32::MAX));
        assert_eq!(estimated_hours(Some(i32::MAX), Some(1)), None);
        assert_eq!(estimated_hours(Some(i32::MIN), Some(-1)), None);
    }

    fn text() -> DocumentText<'static> {
        DocumentText {
            site: "LLL",
            installation: "PTA1",
            discipline_code: "ME",
            document_type_code: "PL",
            sheet_format: Some("A1"),
            file_extension: Some("pdf"),
            description: None,
        }
    }

    #[test]
    fn field_lengths_name_the_column() {
        assert!(check_field_lengths(&text()).is_ok());
        assert_eq!(
            check_field_lengths(&DocumentText { site: "ABCDE", ..text() }),
            Err(FieldTooLong { field: "YACIMIENTO", max: 4 })
        );
        assert_eq!(
            check_field_lengths(&DocumentText { sheet_format: Some("A10"), ..text() }),
            Err(FieldTooLong { field: "FORMATO HOJAS", max: 2 })
        );
        let long = "x".repeat(501);
        assert_eq!(
            check_field_lengths(&DocumentText { description: Some(&long), ..text() }),
            Err(FieldTooLong { field: "DESCRIPCION", max: 500 })
        );
        // Characters, not bytes.
        assert!(check_field_lengths(&DocumentText { site: "ÑAÑA", ..text() }).is_ok());
        assert_matches!(
            CoreError::from(FieldTooLong { field: "INSTALACION", max: 20 }),
            CoreError::Validation(msg) if msg == "INSTALACION exceeds 20 characters"
        );
    }

    #[test]
    fn action_type_column_mapping() {
        assert_eq!(ActionType::from_column_value(1), Some(ActionType::Calificable));
        assert_eq!(ActionType::from_column_value(2), Some(ActionType::Informativo));
        assert_eq!(ActionType::from_column_value(3), None);
        assert_eq!(ActionType::Informativo.column_value(), 2);
        assert_eq!(ActionType::parse("Calificable"), Some(ActionType::Calificable));
    }

    #[test]
    fn emitted_documents_are_locked() {
        assert!(ensure_editable(None, None).is_ok());
        assert!(ensure_editable(Some(""), None).is_ok());
        assert_matches!(ensure_editable(Some("E-01"), None), Err(CoreError::Conflict(_)));
        assert_matches!(ensure_editable(None, Some("X-REV0")), Err(CoreError::Conflict(_)));
    }

    #[test]
    fn upload_extension_must_match() {
        assert!(check_upload_extension(Some("PDF"), "plan.pdf").is_ok());
        assert!(check_upload_extension(Some(".dwg"), "plan.DWG").is_ok());
        assert!(check_upload_extension(None, "anything.bin").is_ok());
        assert_matches!(
            check_upload_extension(Some("pdf"), "plan.docx"),
            Err(CoreError::Validation(msg)) if msg.contains(".pdf") && msg.contains(".docx")
        );
        assert_matches!(
            check_upload_extension(Some("pdf"), "noext"),
            Err(CoreError::Validation(msg)) if msg.contains(".?")
        );
    }
}
