use serde::Serialize;
use sqlx::FromRow;
use doctrack_core::types::DbId;

/// A discipline-of-project link joined with the discipline's code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectDiscipline {
    pub id: DbId,
    pub project_id: DbId,
    pub discipline_id: DbId,
    pub discipline_code: String,
    pub discipline_description: Option<String>,
}
