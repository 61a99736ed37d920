//! Role keys and access policies.
//!
//! Role names are free text in the `roles` table. They are normalized into a
//! small set of keys, and every policy is expressed over those keys.

use serde::Serialize;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_COORDINATOR: &str = "coordinator";
pub const ROLE_DOCUMENT_CONTROL: &str = "document_control";
pub const ROLE_WORKER: &str = "worker";
pub const ROLE_UNKNOWN: &str = "unknown";

/// Trim, lowercase and strip diacritics.
pub fn normalize_role_name(name: &str) -> String {
    name.trim()
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect()
}

/// Map a stored role name to its key.
///
/// Unrecognized names map to their normalized form; blank names map to
/// [`ROLE_UNKNOWN`].
pub fn role_key(role_name: &str) -> String {
    let normalized = normalize_role_name(role_name);
    let key = match normalized.as_str() {
        "administrador" | "admin" => ROLE_ADMIN,
        "coordinador" => ROLE_COORDINATOR,
        "control documentacion"
        | "control de documentacion"
        | "control-documentacion"
        | "control_documentacion" => ROLE_DOCUMENT_CONTROL,
        "trabajador" | "trabajador comun" | "proyectista" => ROLE_WORKER,
        "" => ROLE_UNKNOWN,
        _ => return normalized,
    };
    key.to_string()
}

/// The caller's role and discipline, as far as authorization cares.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Access {
    pub role_key: String,
    /// Upper-cased discipline code, if the user belongs to one.
    pub discipline_code: Option<String>,
}

/// Which disciplines a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisciplineScope {
    All,
    Only(String),
    Nothing,
}

impl Access {
    pub fn new(role_name: &str, discipline_code: Option<&str>) -> Self {
        Self {
            role_key: role_key(role_name),
            discipline_code: discipline_code
                .map(|c| c.trim().to_uppercase())
                .filter(|c| !c.is_empty()),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role_key == ROLE_ADMIN
    }

    pub fn can_view_all_documents(&self) -> bool {
        matches!(
            self.role_key.as_str(),
            ROLE_ADMIN | ROLE_COORDINATOR | ROLE_DOCUMENT_CONTROL
        )
    }

    /// Import, edit, delete and attach files.
    pub fn can_manage_documents(&self) -> bool {
        matches!(self.role_key.as_str(), ROLE_ADMIN | ROLE_DOCUMENT_CONTROL)
    }

    pub fn can_write_projects(&self) -> bool {
        self.is_admin()
    }

    pub fn discipline_scope(&self) -> DisciplineScope {
        if self.can_view_all_documents() {
            return DisciplineScope::All;
        }
        match &self.discipline_code {
            Some(code) => DisciplineScope::Only(code.clone()),
            None => DisciplineScope::Nothing,
        }
    }

    /// Keep the items whose discipline code the caller may see.
    pub fn filter_by_discipline<T, F>(&self, items: Vec<T>, discipline_of: F) -> Vec<T>
    where
        F: Fn(&T) -> Option<&str>,
    {
        match self.discipline_scope() {
            DisciplineScope::All => items,
            DisciplineScope::Nothing => Vec::new(),
            DisciplineScope::Only(code) => items
                .into_iter()
                .filter(|item| {
                    discipline_of(item).is_some_and(|c| c.trim().eq_ignore_ascii_case(&code))
                })
                .collect(),
        }
    }
}
