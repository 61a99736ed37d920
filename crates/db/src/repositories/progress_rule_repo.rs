//! Repository for `progress_rules` and the `project_progress_rules` links.

use sqlx::postgres::PgExecutor;
use sqlx::{PgConnection, PgPool};
use doctrack_core::types::DbId;

use crate::models::progress_rule::{CreateProgressRule, ProgressRule};

const COLUMNS: &str = "r.id, r.revision_type, r.physical_percent, r.certification_percent, r.created_at";

pub struct ProgressRuleRepo;

impl ProgressRuleRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateProgressRule,
    ) -> Result<ProgressRule, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress_rules AS r (revision_type, physical_percent, certification_percent) \
             VALUES (TRIM($1), $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressRule>(&query)
            .bind(&input.revision_type)
            .bind(input.physical_percent)
            .bind(input.certification_percent)
            .fetch_one(pool)
            .await
    }

    /// List every rule in creation order.
    pub async fn list(pool: &PgPool) -> Result<Vec<ProgressRule>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress_rules r ORDER BY r.id");
        sqlx::query_as::<_, ProgressRule>(&query).fetch_all(pool).await
    }

    /// Rules linked to a project, in creation order.
    pub async fn list_for_project<'e>(
        executor: impl PgExecutor<'e>,
        project_id: DbId,
    ) -> Result<Vec<ProgressRule>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_rules r \
             JOIN project_progress_rules pr ON pr.rule_id = r.id \
             WHERE pr.project_id = $1 ORDER BY r.id"
        );
        sqlx::query_as::<_, ProgressRule>(&query)
            .bind(project_id)
            .fetch_all(executor)
            .await
    }

    /// The subset of `ids` with no matching rule.
    pub async fn missing_ids<'e>(
        executor: impl PgExecutor<'e>,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT DISTINCT t.id FROM UNNEST($1::bigint[]) AS t(id) \
             WHERE NOT EXISTS (SELECT 1 FROM progress_rules r WHERE r.id = t.id) \
             ORDER BY t.id",
        )
        .bind(ids)
        .fetch_all(executor)
        .await
    }

    /// Make `rule_ids` the project's full rule set. Duplicates are linked
    /// once. Returns the number of links written.
    pub async fn replace_for_project(
        conn: &mut PgConnection,
        project_id: DbId,
        rule_ids: &[DbId],
    ) -> Result<u64, sqlx::Error> {
        sqlx::query("DELETE FROM project_progress_rules WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *conn)
            .await?;
        let result = sqlx::query(
            "INSERT INTO project_progress_rules (project_id, rule_id) \
             SELECT $1, UNNEST($2::bigint[]) ON CONFLICT DO NOTHING",
        )
        .bind(project_id)
        .bind(rule_ids)
        .execute(&mut *conn)
        .await?;
        Ok(result.rows_affected())
    }
}
