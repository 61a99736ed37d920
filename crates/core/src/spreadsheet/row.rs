//! Per-row parsing and normalization.
//!
//! [`parse_row`] turns the raw cells of one data row into a [`ParsedRow`]:
//! trimmed strings, typed integers, ISO dates, resolved lookup ids and the
//! derived base code and filename. The first problem found aborts with a
//! row-addressed [`ImportError`].

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::document::{
    build_base_code, build_filename, check_field_lengths, estimated_hours, normalize_base_code,
    ActionType, BaseCodeParts, DocumentText, MAX_CODE_LEN,
};
use crate::import::ImportError;
use crate::types::DbId;

use super::cell::compact;
use super::{col, CellValue, EXPECTED_HEADERS};

/// Values users type to mean "no value" in numeric columns.
const DASH_MARKERS: &[char] = &['-', '\u{2013}', '\u{2014}', '\u{2212}'];

static ISO_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid regex"));
static DMY_DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid regex"));

/// Code -> id map for one lookup table. Keys are trimmed and upper-cased.
#[derive(Debug, Clone, Default)]
pub struct LookupTable {
    by_code: HashMap<String, DbId>,
}

impl LookupTable {
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, DbId)>,
        S: AsRef<str>,
    {
        Self {
            by_code: entries
                .into_iter()
                .map(|(code, id)| (normalize_code(code.as_ref()), id))
                .collect(),
        }
    }

    pub fn get(&self, code: &str) -> Option<DbId> {
        self.by_code.get(&normalize_code(code)).copied()
    }

    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Trim and upper-case a lookup code.
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Project-level values every row is checked against.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub client_project_code: &'a str,
    pub internal_project_code: i64,
    pub disciplines: &'a LookupTable,
    pub document_types: &'a LookupTable,
}

/// A validated data row, ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRow {
    /// 1-based spreadsheet row number.
    pub row: usize,
    pub site: String,
    pub installation: String,
    pub discipline_id: DbId,
    pub discipline_code: String,
    pub document_type_id: DbId,
    pub document_type_code: String,
    pub sequence_number: i32,
    pub description: Option<String>,
    pub file_extension: String,
    pub internal_hours: Option<i32>,
    pub external_hours: Option<i32>,
    pub estimated_hours: i32,
    pub sheet_format: Option<String>,
    pub sheet_count: Option<i32>,
    pub action_type: ActionType,
    pub base_date: Option<String>,
    pub planned_issue_date: Option<String>,
    pub sub_project: Option<i32>,
    pub base_code: String,
    pub filename: String,
}

impl ParsedRow {
    /// The base code in duplicate-detection form.
    pub fn normalized_code(&self) -> String {
        normalize_base_code(&self.base_code)
    }
}

/// `true` when every cell of the row is blank.
pub fn is_blank_row(cells: &[CellValue]) -> bool {
    cells.iter().all(CellValue::is_blank)
}

fn cell(cells: &[CellValue], index: usize) -> &CellValue {
    cells.get(index).unwrap_or(&CellValue::Empty)
}

fn header(index: usize) -> &'static str {
    EXPECTED_HEADERS[index]
}

/// Parse one data row. `row` is the 1-based spreadsheet row number.
pub fn parse_row(row: usize, cells: &[CellValue], ctx: &RowContext<'_>) -> Result<ParsedRow, ImportError> {
    // Code components first, so a blank one is reported as such.
    let site = required_text(row, cells, col::SITE)?;
    let installation = required_text(row, cells, col::INSTALLATION)?;
    let discipline_code = normalize_code(&required_text(row, cells, col::DISCIPLINE)?);
    let document_type_code = normalize_code(&required_text(row, cells, col::DOCUMENT_TYPE)?);

    check_client_code(row, cell(cells, col::CLIENT_CODE), ctx.client_project_code)?;
    check_project_code(row, cell(cells, col::PROJECT_CODE), ctx.internal_project_code)?;

    let discipline_id = ctx
        .disciplines
        .get(&discipline_code)
        .ok_or_else(|| ImportError::ReferenceNotFound {
            row,
            table: "disciplines",
            code: discipline_code.clone(),
        })?;
    let document_type_id = ctx
        .document_types
        .get(&document_type_code)
        .ok_or_else(|| ImportError::ReferenceNotFound {
            row,
            table: "document_types",
            code: document_type_code.clone(),
        })?;

    let sub_project = parse_int_cell(row, cells, col::SUB_PROJECT)?;
    let sequence_number = parse_int_cell(row, cells, col::SEQUENCE_NUMBER)?;
    let internal_hours = parse_int_cell(row, cells, col::INTERNAL_HOURS)?;
    let external_hours = parse_int_cell(row, cells, col::EXTERNAL_HOURS)?;
    let sheet_count = parse_int_cell(row, cells, col::SHEET_COUNT)?;

    let description = cell(cells, col::DESCRIPTION).to_optional_string();
    let file_extension = cell(cells, col::FILE_EXTENSION).to_optional_string();
    let sheet_format = cell(cells, col::SHEET_FORMAT).to_optional_string();
    let action_type = parse_action_type(row, cell(cells, col::ACTION_TYPE))?;
    let base_date = parse_date(cell(cells, col::BASE_DATE));
    let planned_issue_date = parse_date(cell(cells, col::PLANNED_ISSUE_DATE));

    check_field_lengths(&DocumentText {
        site: &site,
        installation: &installation,
        discipline_code: &discipline_code,
        document_type_code: &document_type_code,
        sheet_format: sheet_format.as_deref(),
        file_extension: file_extension.as_deref(),
        description: description.as_deref(),
    })
    .map_err(|e| ImportError::row(row, e.field, format!("exceeds {} characters", e.max)))?;
    let estimated = estimated_hours(internal_hours, external_hours).ok_or_else(|| {
        ImportError::row(row, header(col::EXTERNAL_HOURS), "makes the estimated hours overflow")
    })?;

    let base_code = build_base_code(&BaseCodeParts {
        site: &site,
        installation: &installation,
        client_project_code: ctx.client_project_code,
        discipline_code: &discipline_code,
        document_type_code: &document_type_code,
        sequence_number,
    })
    .map_err(|missing| ImportError::row(row, missing.0.label(), "is required to build the document code"))?;

    let file_extension = file_extension.unwrap_or_default();
    let filename = build_filename(&base_code, &file_extension)
        .map_err(|missing| ImportError::row(row, missing.0.label(), "is required to build the filename"))?;

    if base_code.chars().count() > MAX_CODE_LEN {
        return Err(ImportError::row(row, "base_code", format!("exceeds {MAX_CODE_LEN} characters")));
    }
    if filename.chars().count() > MAX_CODE_LEN {
        return Err(ImportError::row(row, "filename", format!("exceeds {MAX_CODE_LEN} characters")));
    }

    Ok(ParsedRow {
        row,
        site,
        installation,
        discipline_id,
        discipline_code,
        document_type_id,
        document_type_code,
        // build_base_code already rejected a missing sequence number.
        sequence_number: sequence_number.unwrap_or_default(),
        description,
        file_extension,
        internal_hours,
        external_hours,
        estimated_hours: estimated,
        sheet_format,
        sheet_count,
        action_type,
        base_date,
        planned_issue_date,
        sub_project,
        base_code,
        filename,
    })
}

fn required_text(row: usize, cells: &[CellValue], index: usize) -> Result<String, ImportError> {
    cell(cells, index)
        .to_optional_string()
        .ok_or_else(|| ImportError::row(row, header(index), "is required"))
}

fn check_client_code(row: usize, value: &CellValue, expected: &str) -> Result<(), ImportError> {
    let field = header(col::CLIENT_CODE);
    let actual = value.to_trimmed_string();
    if actual.is_empty() {
        return Err(ImportError::row(row, field, "is required"));
    }
    if actual != expected.trim() {
        return Err(ImportError::row(
            row,
            field,
            format!("\"{actual}\" does not match the selected project ({})", expected.trim()),
        ));
    }
    Ok(())
}

fn check_project_code(row: usize, value: &CellValue, expected: i64) -> Result<(), ImportError> {
    let field = header(col::PROJECT_CODE);
    let parsed = match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(s) => compact(s).replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    let Some(actual) = parsed.filter(|n| n.is_finite()) else {
        return Err(ImportError::row(
            row,
            field,
            format!("must be numeric (found \"{}\")", value.to_trimmed_string()),
        ));
    };
    if actual != expected as f64 {
        return Err(ImportError::row(
            row,
            field,
            format!("{} does not match the selected project ({expected})", value.to_trimmed_string()),
        ));
    }
    Ok(())
}

/// Parse an optional integer column.
///
/// Blank cells, invisible-only text and dash markers mean "no value". A comma
/// is accepted as the decimal separator but the result must be integral.
fn parse_int_cell(row: usize, cells: &[CellValue], index: usize) -> Result<Option<i32>, ImportError> {
    parse_optional_int(cell(cells, index))
        .map_err(|shown| {
            ImportError::row(
                row,
                header(index),
                format!("must be a whole number or left blank (found \"{shown}\")"),
            )
        })
}

/// `Err` carries the offending value as displayed.
pub fn parse_optional_int(value: &CellValue) -> Result<Option<i32>, String> {
    let number = match value {
        CellValue::Empty => return Ok(None),
        CellValue::Number(n) => *n,
        CellValue::Text(s) => {
            let compacted = compact(s);
            if compacted.is_empty() || compacted.chars().all(|c| DASH_MARKERS.contains(&c)) {
                return Ok(None);
            }
            compacted
                .replace(',', ".")
                .parse::<f64>()
                .map_err(|_| s.trim().to_string())?
        }
        other => return Err(other.to_trimmed_string()),
    };
    if !number.is_finite() || number.fract() != 0.0 || number < i32::MIN as f64 || number > i32::MAX as f64 {
        return Err(value.to_trimmed_string());
    }
    Ok(Some(number as i32))
}

fn parse_action_type(row: usize, value: &CellValue) -> Result<ActionType, ImportError> {
    let field = header(col::ACTION_TYPE);
    match parse_optional_int(value) {
        Ok(None) => Err(ImportError::row(row, field, "is required and must be 1 or 2")),
        Ok(Some(n)) => ActionType::from_column_value(i64::from(n)).ok_or_else(|| {
            ImportError::row(row, field, format!("must be 1 or 2 (found \"{n}\")"))
        }),
        Err(shown) => Err(ImportError::row(row, field, format!("must be 1 or 2 (found \"{shown}\")"))),
    }
}

/// Normalize a date cell to `YYYY-MM-DD` where the format is recognized.
///
/// Cells the workbook formats as dates and `DD/MM/YYYY` text are converted;
/// ISO text is kept. Anything else, plain numbers included, is returned as
/// text and left for the database to cast.
pub fn parse_date(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Date(date) => Some(date.format("%Y-%m-%d").to_string()),
        other => {
            let text = other.to_optional_string()?;
            if ISO_DATE_RE.is_match(&text) {
                return Some(text);
            }
            if let Some(caps) = DMY_DATE_RE.captures(&text) {
                return Some(format!("{}-{}-{}", &caps[3], &caps[2], &caps[1]));
            }
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::NaiveDate;

    fn lookups() -> (LookupTable, LookupTable) {
        (
            LookupTable::new([("ME", 1), ("EL", 2)]),
            LookupTable::new([("PL", 10), ("ES", 11)]),
        )
    }

    fn ctx<'a>(disciplines: &'a LookupTable, types: &'a LookupTable) -> RowContext<'a> {
        RowContext {
            client_project_code: "C100",
            internal_project_code: 4521,
            disciplines,
            document_types: types,
        }
    }

    fn good_row() -> Vec<CellValue> {
        vec![
            CellValue::text("LLL"),
            CellValue::text("PTA1"),
            CellValue::text("me"),
            CellValue::text("pl"),
            CellValue::Number(7.0),
            CellValue::text(" Layout plan "),
            CellValue::text("pdf"),
            CellValue::Number(10.0),
            CellValue::text("5"),
            CellValue::text("A1"),
            CellValue::Number(3.0),
            CellValue::Number(1.0),
            CellValue::text("05/03/2024"),
            CellValue::Date(NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()),
            CellValue::text("C100"),
            CellValue::Number(4521.0),
            CellValue::Empty,
        ]
    }

    #[test]
    fn parses_a_complete_row() {
        let (d, t) = lookups();
        let parsed = parse_row(2, &good_row(), &ctx(&d, &t)).unwrap();
        assert_eq!(parsed.base_code, "LLL-PTA1-C100-ME-PL-7");
        assert_eq!(parsed.filename, "LLL-PTA1-C100-ME-PL-7.pdf");
        assert_eq!(parsed.discipline_id, 1);
        assert_eq!(parsed.document_type_id, 10);
        assert_eq!(parsed.description.as_deref(), Some("Layout plan"));
        assert_eq!(parsed.estimated_hours, 15);
        assert_eq!(parsed.action_type, ActionType::Calificable);
        assert_eq!(parsed.base_date.as_deref(), Some("2024-03-05"));
        assert_eq!(parsed.planned_issue_date.as_deref(), Some("2024-04-01"));
        assert_eq!(parsed.sub_project, None);
    }

    #[test]
    fn blank_site_is_reported_first() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::SITE] = CellValue::text("   ");
        row[col::CLIENT_CODE] = CellValue::text("OTHER");
        assert_matches!(
            parse_row(5, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { row: 5, field: "YACIMIENTO", .. })
        );
    }

    #[test]
    fn client_code_must_match_project() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::CLIENT_CODE] = CellValue::text("C999");
        assert_matches!(
            parse_row(3, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { row: 3, field: "COD CLIENTE", .. })
        );
        row[col::CLIENT_CODE] = CellValue::Empty;
        assert_matches!(
            parse_row(3, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "COD CLIENTE", message, .. }) if message == "is required"
        );
    }

    #[test]
    fn project_code_is_compared_numerically() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::PROJECT_CODE] = CellValue::text(" 4521 ");
        assert!(parse_row(2, &row, &ctx(&d, &t)).is_ok());
        row[col::PROJECT_CODE] = CellValue::text("4522");
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "COD PROYECTO", .. })
        );
        row[col::PROJECT_CODE] = CellValue::text("abc");
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "COD PROYECTO", message, .. }) if message.contains("numeric")
        );
    }

    #[test]
    fn unknown_lookup_codes() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::DISCIPLINE] = CellValue::text("XX");
        assert_matches!(
            parse_row(4, &row, &ctx(&d, &t)),
            Err(ImportError::ReferenceNotFound { row: 4, table: "disciplines", code }) if code == "XX"
        );
        let mut row = good_row();
        row[col::DOCUMENT_TYPE] = CellValue::text("zz");
        assert_matches!(
            parse_row(4, &row, &ctx(&d, &t)),
            Err(ImportError::ReferenceNotFound { table: "document_types", code, .. }) if code == "ZZ"
        );
    }

    #[test]
    fn integer_markers_and_errors() {
        assert_eq!(parse_optional_int(&CellValue::Empty), Ok(None));
        assert_eq!(parse_optional_int(&CellValue::text(" - ")), Ok(None));
        assert_eq!(parse_optional_int(&CellValue::text("\u{2014}\u{2014}")), Ok(None));
        assert_eq!(parse_optional_int(&CellValue::text("\u{200B}")), Ok(None));
        assert_eq!(parse_optional_int(&CellValue::text("12,0")), Ok(Some(12)));
        assert_eq!(parse_optional_int(&CellValue::text("1 200")), Ok(Some(1200)));
        assert_eq!(parse_optional_int(&CellValue::Number(4.0)), Ok(Some(4)));
        assert!(parse_optional_int(&CellValue::text("12,5")).is_err());
        assert!(parse_optional_int(&CellValue::text("abc")).is_err());
        assert!(parse_optional_int(&CellValue::Number(1e12)).is_err());
    }

    #[test]
    fn hours_sum_overflow_is_rejected() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::INTERNAL_HOURS] = CellValue::Number(f64::from(i32::MAX));
        row[col::EXTERNAL_HOURS] = CellValue::Number(0.0);
        assert_eq!(parse_row(2, &row, &ctx(&d, &t)).unwrap().estimated_hours, i32::MAX);

        row[col::EXTERNAL_HOURS] = CellValue::Number(1.0);
        assert_matches!(
            parse_row(6, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { row: 6, field: "HRS EXT", message }) if message.contains("overflow")
        );
    }

    #[test]
    fn invalid_hours_name_the_column() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::EXTERNAL_HOURS] = CellValue::text("five");
        assert_matches!(
            parse_row(9, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { row: 9, field: "HRS EXT", message }) if message.contains("five")
        );
    }

    #[test]
    fn classifier_must_be_one_or_two() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::ACTION_TYPE] = CellValue::Number(2.0);
        assert_eq!(
            parse_row(2, &row, &ctx(&d, &t)).unwrap().action_type,
            ActionType::Informativo
        );
        row[col::ACTION_TYPE] = CellValue::Number(3.0);
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "Calificable 1, Informativo 2", .. })
        );
        row[col::ACTION_TYPE] = CellValue::Empty;
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { message, .. }) if message.contains("required")
        );
    }

    #[test]
    fn missing_sequence_and_extension() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::SEQUENCE_NUMBER] = CellValue::text("-");
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "NRO DOC", .. })
        );
        let mut row = good_row();
        row[col::FILE_EXTENSION] = CellValue::Empty;
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "TIPO ARCHIVO", .. })
        );
    }

    #[test]
    fn length_limits() {
        let (d, t) = lookups();
        let mut row = good_row();
        row[col::SITE] = CellValue::text("ABCDE");
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "YACIMIENTO", message, .. }) if message.contains('4')
        );
        let mut row = good_row();
        row[col::DESCRIPTION] = CellValue::text("x".repeat(501));
        assert_matches!(
            parse_row(2, &row, &ctx(&d, &t)),
            Err(ImportError::RowValidation { field: "DESCRIPCION", .. })
        );
    }

    #[test]
    fn dates() {
        assert_eq!(parse_date(&CellValue::text("2024-01-31")).as_deref(), Some("2024-01-31"));
        assert_eq!(parse_date(&CellValue::text("31/01/2024")).as_deref(), Some("2024-01-31"));
        assert_eq!(parse_date(&CellValue::text("Jan 31")).as_deref(), Some("Jan 31"));
        assert_eq!(
            parse_date(&CellValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())).as_deref(),
            Some("2024-01-01")
        );
        // Unformatted numbers are not Excel serials.
        assert_eq!(parse_date(&CellValue::Number(2024.0)).as_deref(), Some("2024"));
        assert_eq!(parse_date(&CellValue::Number(45292.0)).as_deref(), Some("45292"));
        assert_eq!(parse_date(&CellValue::text("  ")), None);
    }

    #[test]
    fn blank_rows() {
        assert!(is_blank_row(&[CellValue::Empty, CellValue::text(" ")]));
        assert!(is_blank_row(&[]));
        assert!(!is_blank_row(&[CellValue::Empty, CellValue::Number(0.0)]));
    }
}
