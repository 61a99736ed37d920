//! Repository for `project_disciplines`, the discipline-of-project links.
//!
//! Links are created lazily: the first document of a discipline imported or
//! edited into a project creates the link.

use sqlx::postgres::PgExecutor;
use doctrack_core::types::DbId;

use crate::models::project_discipline::ProjectDiscipline;

const COLUMNS: &str = "pd.id, pd.project_id, pd.discipline_id, \
    d.code AS discipline_code, d.description AS discipline_description";

pub struct ProjectDisciplineRepo;

impl ProjectDisciplineRepo {
    /// List the project's links ordered by discipline code.
    pub async fn list_by_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<Vec<ProjectDiscipline>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_disciplines pd \
             JOIN disciplines d ON d.id = pd.discipline_id \
             WHERE pd.project_id = $1 \
             ORDER BY d.code"
        );
        sqlx::query_as::<_, ProjectDiscipline>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// Create whichever of `discipline_ids` are not linked yet.
    ///
    /// Returns the number of links created.
    pub async fn link_many<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
        discipline_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        if discipline_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query(
            "INSERT INTO project_disciplines (project_id, discipline_id) \
             SELECT $1, UNNEST($2::bigint[]) \
             ON CONFLICT (project_id, discipline_id) DO NOTHING",
        )
        .bind(project_id)
        .bind(discipline_ids)
        .execute(executor)
        .await?;
        Ok(result.rows_affected())
    }

    /// Return the link id for `(project_id, discipline_id)`, creating it if
    /// missing.
    pub async fn ensure<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
        discipline_id: DbId,
    ) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO project_disciplines (project_id, discipline_id) \
             VALUES ($1, $2) \
             ON CONFLICT (project_id, discipline_id) \
             DO UPDATE SET project_id = EXCLUDED.project_id \
             RETURNING id",
        )
        .bind(project_id)
        .bind(discipline_id)
        .fetch_one(executor)
        .await
    }
}
