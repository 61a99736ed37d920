//! Styled workbook rendering for exports.

use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Workbook};

use super::{CellValue, SpreadsheetError, COLUMN_COUNT, EXPECTED_HEADERS};

/// Name of the single worksheet in exported workbooks.
pub const SHEET_NAME: &str = "Documentos";

/// Column widths in pixels, converted to character widths on render.
const COLUMN_WIDTHS_PX: [u32; COLUMN_COUNT] = [
    110, 140, 90, 90, 90, 405, 105, 60, 60, 120, 80, 185, 110, 110, 120, 110, 110,
];

const HEADER_ROW_HEIGHT: f64 = 24.0;

/// Approximate character width for a pixel width, never below 6.
pub fn px_to_chars(px: u32) -> f64 {
    (f64::from(px) / 7.0).round().max(6.0)
}

fn header_format() -> Format {
    Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0x111827))
        .set_background_color(Color::RGB(0xCFEFFF))
        .set_border(FormatBorder::Thin)
        .set_border_color(Color::RGB(0x93C5FD))
        .set_align(FormatAlign::Center)
        .set_align(FormatAlign::VerticalCenter)
        .set_text_wrap()
}

/// Render the header row plus `rows` into an `.xlsx` buffer.
///
/// Cells past the 17th column are ignored. Empty cells are left unwritten.
pub fn render_workbook(rows: &[Vec<CellValue>]) -> Result<Vec<u8>, SpreadsheetError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    let header = header_format();
    for (col, title) in EXPECTED_HEADERS.iter().enumerate() {
        let col = col as u16;
        sheet.write_string_with_format(0, col, *title, &header)?;
        sheet.set_column_width(col, px_to_chars(COLUMN_WIDTHS_PX[col as usize]))?;
    }
    sheet.set_row_height(0, HEADER_ROW_HEIGHT)?;
    sheet.set_freeze_panes(1, 0)?;

    for (index, cells) in rows.iter().enumerate() {
        let row = (index + 1) as u32;
        for (col, value) in cells.iter().take(COLUMN_COUNT).enumerate() {
            let col = col as u16;
            match value {
                CellValue::Empty => {}
                CellValue::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
                CellValue::Bool(b) => {
                    sheet.write_boolean(row, col, *b)?;
                }
                CellValue::Text(_) | CellValue::Date(_) => {
                    sheet.write_string(row, col, value.to_trimmed_string())?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
