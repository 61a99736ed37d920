//! The document spreadsheet layout and its codec.
//!
//! - [`cell`] -- typed cell values decoupled from the xlsx library.
//! - [`header`] -- header row validation.
//! - [`row`] -- per-row parsing and normalization.
//! - [`reader`] -- first-worksheet extraction from an uploaded workbook.
//! - [`writer`] -- styled workbook rendering for exports.

pub mod cell;
pub mod header;
pub mod reader;
pub mod row;
pub mod writer;

pub use cell::CellValue;

/// Number of columns in the document layout.
pub const COLUMN_COUNT: usize = 17;

/// Expected header row, in column order.
pub const EXPECTED_HEADERS: [&str; COLUMN_COUNT] = [
    "YACIMIENTO",
    "INSTALACION",
    "DISCIPLINA",
    "TIPO DOC",
    "NRO DOC",
    "DESCRIPCION",
    "TIPO ARCHIVO",
    "HRS INT",
    "HRS EXT",
    "FORMATO HOJAS",
    "CANT HOJAS",
    "Calificable 1, Informativo 2",
    "FECHA BASE",
    "FECHA EMISION",
    "COD CLIENTE",
    "COD PROYECTO",
    "SUB PROYECTO",
];

/// Column indexes (0-based) into a spreadsheet row.
pub mod col {
    pub const SITE: usize = 0;
    pub const INSTALLATION: usize = 1;
    pub const DISCIPLINE: usize = 2;
    pub const DOCUMENT_TYPE: usize = 3;
    pub const SEQUENCE_NUMBER: usize = 4;
    pub const DESCRIPTION: usize = 5;
    pub const FILE_EXTENSION: usize = 6;
    pub const INTERNAL_HOURS: usize = 7;
    pub const EXTERNAL_HOURS: usize = 8;
    pub const SHEET_FORMAT: usize = 9;
    pub const SHEET_COUNT: usize = 10;
    pub const ACTION_TYPE: usize = 11;
    pub const BASE_DATE: usize = 12;
    pub const PLANNED_ISSUE_DATE: usize = 13;
    pub const CLIENT_CODE: usize = 14;
    pub const PROJECT_CODE: usize = 15;
    pub const SUB_PROJECT: usize = 16;
}

/// Spreadsheet letter for a 0-based column index (`0` -> `"A"`, `26` -> `"AA"`).
pub fn column_letter(index: usize) -> String {
    let mut n = index + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push(char::from(b'A' + rem as u8));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Failure to decode or encode a workbook.
#[derive(Debug, thiserror::Error)]
pub enum SpreadsheetError {
    #[error("Could not read the spreadsheet: {0}")]
    Unreadable(String),

    #[error("The spreadsheet has no worksheets")]
    NoSheets,

    #[error("The spreadsheet is empty")]
    Empty,

    #[error("Could not write the spreadsheet: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(11), "L");
        assert_eq!(column_letter(16), "Q");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
    }

    #[test]
    fn layout_has_seventeen_columns() {
        assert_eq!(EXPECTED_HEADERS.len(), COLUMN_COUNT);
        assert_eq!(EXPECTED_HEADERS[col::SUB_PROJECT], "SUB PROYECTO");
        assert_eq!(EXPECTED_HEADERS[col::CLIENT_CODE], "COD CLIENTE");
    }
}
