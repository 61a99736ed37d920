//! Repository for the `projects` table.

use sqlx::postgres::PgExecutor;
use sqlx::PgPool;
use doctrack_core::project::{contract_duration_days, DEFAULT_DAYS_PER_WEEK, DEFAULT_HOURS_PER_DAY};
use doctrack_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries. Expects `p` = projects, `c` = clients.
const COLUMNS: &str = "p.id, p.name, p.location, p.client_id, c.name AS client_name, \
    p.client_project_code, p.internal_project_code, p.contract_number, \
    p.contract_start_date, p.pem_date, p.contract_duration_days, \
    p.hours_per_day, p.days_per_week, p.created_at, p.updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, deriving its contract duration.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let duration = contract_duration_days(input.contract_start_date, input.pem_date);
        let query = format!(
            "WITH p AS (
                INSERT INTO projects (name, location, client_id, client_project_code,
                    internal_project_code, contract_number, contract_start_date, pem_date,
                    contract_duration_days, hours_per_day, days_per_week)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, {DEFAULT_HOURS_PER_DAY}),
                    COALESCE($11, {DEFAULT_DAYS_PER_WEEK}))
                RETURNING *
             )
             SELECT {COLUMNS} FROM p LEFT JOIN clients c ON c.id = p.client_id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.name.trim())
            .bind(&input.location)
            .bind(input.client_id)
            .bind(input.client_project_code.as_deref().map(str::trim))
            .bind(input.internal_project_code)
            .bind(&input.contract_number)
            .bind(input.contract_start_date)
            .bind(input.pem_date)
            .bind(duration)
            .bind(input.hours_per_day)
            .bind(input.days_per_week)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p LEFT JOIN clients c ON c.id = p.client_id WHERE p.id = $1"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all projects, most recently created first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects p LEFT JOIN clients c ON c.id = p.client_id \
             ORDER BY p.created_at DESC, p.id DESC"
        );
        sqlx::query_as::<_, Project>(&query).fetch_all(pool).await
    }

    /// Update a project. Only non-`None` fields in `input` are applied; the
    /// contract duration is re-derived from the resulting dates.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "WITH p AS (
                UPDATE projects SET
                    name = COALESCE($2, name),
                    location = COALESCE($3, location),
                    client_id = COALESCE($4, client_id),
                    client_project_code = COALESCE($5, client_project_code),
                    internal_project_code = COALESCE($6, internal_project_code),
                    contract_number = COALESCE($7, contract_number),
                    contract_start_date = COALESCE($8, contract_start_date),
                    pem_date = COALESCE($9, pem_date),
                    contract_duration_days =
                        ABS(COALESCE($9, pem_date) - COALESCE($8, contract_start_date)),
                    hours_per_day = COALESCE($10, hours_per_day),
                    days_per_week = COALESCE($11, days_per_week),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {COLUMNS} FROM p LEFT JOIN clients c ON c.id = p.client_id"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(&input.location)
            .bind(input.client_id)
            .bind(input.client_project_code.as_deref().map(str::trim))
            .bind(input.internal_project_code)
            .bind(&input.contract_number)
            .bind(input.contract_start_date)
            .bind(input.pem_date)
            .bind(input.hours_per_day)
            .bind(input.days_per_week)
            .fetch_optional(executor)
            .await
    }
}
