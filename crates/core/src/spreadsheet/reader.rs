//! First-worksheet extraction from an uploaded workbook.

use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use super::{CellValue, SpreadsheetError};

/// Read every row of the first worksheet of a workbook.
///
/// The format is sniffed from the bytes: `.xls`, `.xlsx`, `.xlsb` and `.ods`
/// are accepted.
///
/// Rows are positioned from cell `A1` regardless of where the used range
/// starts, so index 0 is always spreadsheet row 1. Returns
/// [`SpreadsheetError::Empty`] when the sheet has no cells at all.
pub fn read_first_sheet(bytes: &[u8]) -> Result<Vec<Vec<CellValue>>, SpreadsheetError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(SpreadsheetError::NoSheets)?
        .map_err(|e| SpreadsheetError::Unreadable(e.to_string()))?;

    let Some((start_row, start_col)) = range.start() else {
        return Err(SpreadsheetError::Empty);
    };

    let leading_cols = start_col as usize;
    let mut rows: Vec<Vec<CellValue>> = (0..start_row).map(|_| Vec::new()).collect();
    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; leading_cols];
        cells.extend(row.iter().map(CellValue::from));
        rows.push(cells);
    }

    tracing::debug!(rows = rows.len(), "Read first worksheet");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use assert_matches::assert_matches;
    use rust_xlsxwriter::Workbook;

    const ODS_MIMETYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";

    /// Minimal OpenDocument spreadsheet with one sheet and the given `content.xml` body rows.
    fn ods_with_rows(rows: &str) -> Vec<u8> {
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<office:document-content xmlns:office="urn:oasis:names:tc:opendocument:xmlns:office:1.0" xmlns:table="urn:oasis:names:tc:opendocument:xmlns:table:1.0" xmlns:text="urn:oasis:names:tc:opendocument:xmlns:text:1.0" office:version="1.2">
<office:body><office:spreadsheet><table:table table:name="Documentos">{rows}</table:table></office:spreadsheet></office:body>
</office:document-content>"#
        );

        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Stored);
        zip.start_file("mimetype", options).unwrap();
        zip.write_all(ODS_MIMETYPE.as_bytes()).unwrap();
        zip.start_file("content.xml", options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
        zip.finish().unwrap().into_inner()
    }

    #[test]
    fn reads_cells_from_a1() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "YACIMIENTO").unwrap();
        sheet.write_string(0, 1, "INSTALACION").unwrap();
        sheet.write_number(1, 1, 42.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_first_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], CellValue::text("YACIMIENTO"));
        assert_eq!(rows[1][0], CellValue::Empty);
        assert_eq!(rows[1][1], CellValue::Number(42.0));
    }

    #[test]
    fn offset_ranges_keep_their_positions() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(2, 3, "X").unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let rows = read_first_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert_eq!(rows[2][3], CellValue::text("X"));
    }

    #[test]
    fn empty_sheet_is_rejected() {
        let mut workbook = Workbook::new();
        workbook.add_worksheet();
        let bytes = workbook.save_to_buffer().unwrap();
        assert_matches!(read_first_sheet(&bytes), Err(SpreadsheetError::Empty));
    }

    #[test]
    fn reads_open_document_spreadsheets() {
        let bytes = ods_with_rows(concat!(
            r#"<table:table-row><table:table-cell office:value-type="string"><text:p>YACIMIENTO</text:p></table:table-cell></table:table-row>"#,
            r#"<table:table-row><table:table-cell/><table:table-cell office:value-type="float" office:value="42"><text:p>42</text:p></table:table-cell></table:table-row>"#,
        ));

        let rows = read_first_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0][0], CellValue::text("YACIMIENTO"));
        assert_eq!(rows[1][1], CellValue::Number(42.0));
    }

    #[test]
    fn zip_without_a_workbook_is_unreadable() {
        let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("hello.txt", zip::write::SimpleFileOptions::default())
            .unwrap();
        zip.write_all(b"hello").unwrap();
        let bytes = zip.finish().unwrap().into_inner();

        assert_matches!(
            read_first_sheet(&bytes),
            Err(SpreadsheetError::Unreadable(_))
        );
    }

    #[test]
    fn garbage_is_unreadable() {
        assert_matches!(
            read_first_sheet(b"not a workbook"),
            Err(SpreadsheetError::Unreadable(_))
        );
    }
}
