//! Duplicate base-code detection for an upload.

use std::collections::{HashMap, HashSet};

use crate::document::normalize_base_code;

use super::ImportError;

/// Tracks the normalized base codes seen so far in one upload.
#[derive(Debug, Default)]
pub struct DuplicateGuard {
    first_row: HashMap<String, usize>,
}

impl DuplicateGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `code` for `row`, failing if an earlier row produced the same
    /// normalized code.
    pub fn check(&mut self, row: usize, code: &str) -> Result<(), ImportError> {
        let key = normalize_base_code(code);
        if let Some(&first_row) = self.first_row.get(&key) {
            return Err(ImportError::DuplicateInUpload {
                first_row,
                row,
                code: code.to_string(),
            });
        }
        self.first_row.insert(key, row);
        Ok(())
    }
}

/// Build the set of normalized codes already stored for a project.
pub fn normalized_set<I, S>(codes: I) -> HashSet<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    codes
        .into_iter()
        .map(|c| normalize_base_code(c.as_ref()))
        .collect()
}

/// Fail on the first `(row, code)` whose normalized code is in `existing`.
pub fn check_existing<'a, I>(existing: &HashSet<String>, rows: I) -> Result<(), ImportError>
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    for (row, code) in rows {
        if existing.contains(&normalize_base_code(code)) {
            return Err(ImportError::DuplicateExisting {
                row,
                code: code.to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn repeated_code_names_both_rows() {
        let mut guard = DuplicateGuard::new();
        guard.check(2, "LLL-P-C-ME-PL-1").unwrap();
        guard.check(3, "LLL-P-C-ME-PL-2").unwrap();
        assert_matches!(
            guard.check(7, "lll-p-c-me-pl-1 "),
            Err(ImportError::DuplicateInUpload { first_row: 2, row: 7, .. })
        );
    }

    #[test]
    fn existing_codes_are_compared_normalized() {
        let existing = normalized_set(["lll-p-c-me-pl-1"]);
        assert!(check_existing(&existing, [(2, "LLL-P-C-ME-PL-2")]).is_ok());
        assert_matches!(
            check_existing(&existing, [(2, "LLL-P-C-ME-PL-2"), (3, "LLL-P-C-ME-PL-1")]),
            Err(ImportError::DuplicateExisting { row: 3, code }) if code == "LLL-P-C-ME-PL-1"
        );
    }
}
