use crate::spreadsheet::SpreadsheetError;

use super::store::StoreError;

/// Everything that can abort a spreadsheet import.
///
/// Every variant aborts the whole import; nothing is persisted unless all
/// rows pass. Row numbers are 1-based spreadsheet rows (the header is row 1).
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error(transparent)]
    Spreadsheet(#[from] SpreadsheetError),

    #[error("Invalid header in column {column}: expected \"{expected}\", found \"{actual}\"")]
    HeaderMismatch {
        column: String,
        expected: &'static str,
        actual: String,
    },

    #[error("Row {row}: \"{field}\" {message}")]
    RowValidation {
        row: usize,
        field: &'static str,
        message: String,
    },

    #[error("Row {row}: {table} \"{code}\" does not exist")]
    ReferenceNotFound {
        row: usize,
        table: &'static str,
        code: String,
    },

    #[error("Duplicate document in the spreadsheet: base code \"{code}\" appears in rows {first_row} and {row}")]
    DuplicateInUpload {
        first_row: usize,
        row: usize,
        code: String,
    },

    #[error("Row {row}: the document already exists in this project (base code \"{code}\")")]
    DuplicateExisting { row: usize, code: String },

    #[error("A document with the same base code was stored concurrently: {0}")]
    DuplicateOnCommit(String),

    #[error("The selected project has no \"{0}\"")]
    ProjectIncomplete(&'static str),

    #[error("{0}")]
    Persistence(String),
}

impl ImportError {
    pub(crate) fn row(row: usize, field: &'static str, message: impl Into<String>) -> Self {
        Self::RowValidation {
            row,
            field,
            message: message.into(),
        }
    }

    /// `true` for the duplicate-code family of errors.
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            Self::DuplicateInUpload { .. } | Self::DuplicateExisting { .. } | Self::DuplicateOnCommit(_)
        )
    }
}

impl From<StoreError> for ImportError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => Self::DuplicateOnCommit(constraint),
            StoreError::Backend(msg) => Self::Persistence(msg),
        }
    }
}
