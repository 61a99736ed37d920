//! Progress-measurement rules and their project links.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use doctrack_core::types::{DbId, Timestamp};

/// A row from `progress_rules`: how much physical and certification progress
/// a revision of the given type is worth.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgressRule {
    pub id: DbId,
    pub revision_type: String,
    pub physical_percent: i32,
    pub certification_percent: i32,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProgressRule {
    pub revision_type: String,
    pub physical_percent: i32,
    pub certification_percent: i32,
}
