//! Header row validation.

use crate::import::ImportError;

use super::{column_letter, CellValue, EXPECTED_HEADERS};

/// Older templates spelled column L with a dash instead of a comma.
const ACTION_TYPE_HEADER_ALIAS: &str = "Calificable 1- Informativo 2";

fn header_matches(index: usize, actual: &str) -> bool {
    actual == EXPECTED_HEADERS[index]
        || (index == super::col::ACTION_TYPE && actual == ACTION_TYPE_HEADER_ALIAS)
}

/// Compare `row` position by position against [`EXPECTED_HEADERS`].
///
/// Cells are trimmed before comparing. Extra trailing columns are ignored.
/// The first mismatch is reported with its column letter.
pub fn validate_headers(row: &[CellValue]) -> Result<(), ImportError> {
    for (index, expected) in EXPECTED_HEADERS.iter().enumerate() {
        let actual = row
            .get(index)
            .map(CellValue::to_trimmed_string)
            .unwrap_or_default();
        if !header_matches(index, &actual) {
            return Err(ImportError::HeaderMismatch {
                column: column_letter(index),
                expected,
                actual: if actual.is_empty() {
                    "(empty)".to_string()
                } else {
                    actual
                },
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn header_row() -> Vec<CellValue> {
        EXPECTED_HEADERS.iter().map(|h| CellValue::text(*h)).collect()
    }

    #[test]
    fn accepts_exact_headers() {
        assert!(validate_headers(&header_row()).is_ok());
    }

    #[test]
    fn accepts_padded_headers_and_extra_columns() {
        let mut row: Vec<CellValue> = EXPECTED_HEADERS
            .iter()
            .map(|h| CellValue::text(format!("  {h} ")))
            .collect();
        row.push(CellValue::text("NOTES"));
        assert!(validate_headers(&row).is_ok());
    }

    #[test]
    fn accepts_legacy_action_type_header() {
        let mut row = header_row();
        row[11] = CellValue::text(ACTION_TYPE_HEADER_ALIAS);
        assert!(validate_headers(&row).is_ok());
    }

    #[test]
    fn every_single_column_deviation_is_reported() {
        for index in 0..EXPECTED_HEADERS.len() {
            let mut row = header_row();
            row[index] = CellValue::text("WRONG");
            let expected_letter = column_letter(index);
            assert_matches!(
                validate_headers(&row),
                Err(ImportError::HeaderMismatch { column, expected, actual })
                    if column == expected_letter
                        && expected == EXPECTED_HEADERS[index]
                        && actual == "WRONG"
            );
        }
    }

    #[test]
    fn missing_cells_report_empty() {
        let row = header_row()[..5].to_vec();
        assert_matches!(
            validate_headers(&row),
            Err(ImportError::HeaderMismatch { column, actual, .. })
                if column == "F" && actual == "(empty)"
        );
    }
}
