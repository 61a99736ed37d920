//! Handlers for the `/projects` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use doctrack_core::error::CoreError;
use doctrack_core::project::validate_project_fields;
use doctrack_core::types::DbId;
use doctrack_db::models::document::Document;
use doctrack_db::models::progress_rule::ProgressRule;
use doctrack_db::models::project::{CreateProject, Project, UpdateProject};
use doctrack_db::models::project_discipline::ProjectDiscipline;
use doctrack_db::repositories::{
    DocumentRepo, ProgressRuleRepo, ProjectDisciplineRepo, ProjectRepo,
};
use doctrack_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

/// Project body of create and update, plus the progress rules to link.
///
/// On update, an absent `rule_ids` leaves the links untouched and an empty
/// list clears them.
#[derive(Debug, Deserialize)]
pub struct ProjectInput<T> {
    #[serde(flatten)]
    pub project: T,
    #[serde(default)]
    pub rule_ids: Option<Vec<DbId>>,
}

/// A project with its linked progress rules.
#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub progress_rules: Vec<ProgressRule>,
}

impl ProjectDetail {
    async fn load(pool: &DbPool, project: Project) -> AppResult<Self> {
        let progress_rules = ProgressRuleRepo::list_for_project(pool, project.id).await?;
        Ok(Self {
            project,
            progress_rules,
        })
    }
}

/// Reject rule ids that do not exist.
async fn ensure_rules_exist(pool: &DbPool, rule_ids: &[DbId]) -> AppResult<()> {
    if rule_ids.is_empty() {
        return Ok(());
    }
    let missing = ProgressRuleRepo::missing_ids(pool, rule_ids).await?;
    if let Some(first) = missing.first() {
        return Err(CoreError::Validation(format!("Progress rule {first} does not exist")).into());
    }
    Ok(())
}

/// Load a project or fail with 404.
pub(crate) async fn find_project(pool: &DbPool, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// POST /api/v1/projects
///
/// The project and its progress-rule links are written in one transaction.
pub async fn create(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<ProjectInput<CreateProject>>,
) -> AppResult<(StatusCode, Json<DataResponse<ProjectDetail>>)> {
    let ProjectInput { project: fields, rule_ids } = input;
    validate_project_fields(Some(&fields.name), fields.hours_per_day, fields.days_per_week)?;
    let rule_ids = rule_ids.unwrap_or_default();
    ensure_rules_exist(&state.pool, &rule_ids).await?;

    let mut tx = state.pool.begin().await?;
    let project = ProjectRepo::create(&mut *tx, &fields).await?;
    let linked = ProgressRuleRepo::replace_for_project(&mut tx, project.id, &rule_ids).await?;
    tx.commit().await?;

    tracing::info!(
        project_id = project.id,
        user_id = user.user_id,
        rules = linked,
        "Project created"
    );
    let data = ProjectDetail::load(&state.pool, project).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data })))
}

/// GET /api/v1/projects
pub async fn list(
    _user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Project>>>> {
    let projects = ProjectRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: projects }))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    _user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let project = find_project(&state.pool, id).await?;
    let data = ProjectDetail::load(&state.pool, project).await?;
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/projects/{id}
pub async fn update(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ProjectInput<UpdateProject>>,
) -> AppResult<Json<DataResponse<ProjectDetail>>> {
    let ProjectInput { project: fields, rule_ids } = input;
    validate_project_fields(fields.name.as_deref(), fields.hours_per_day, fields.days_per_week)?;
    if let Some(ids) = &rule_ids {
        ensure_rules_exist(&state.pool, ids).await?;
    }

    let mut tx = state.pool.begin().await?;
    let project = ProjectRepo::update(&mut *tx, id, &fields)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    if let Some(ids) = &rule_ids {
        ProgressRuleRepo::replace_for_project(&mut tx, id, ids).await?;
    }
    tx.commit().await?;

    tracing::info!(project_id = id, user_id = user.user_id, "Project updated");
    let data = ProjectDetail::load(&state.pool, project).await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/projects/{id}/disciplines
///
/// Callers who cannot see every discipline only get their own.
pub async fn list_disciplines(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<ProjectDiscipline>>>> {
    find_project(&state.pool, id).await?;
    let links = ProjectDisciplineRepo::list_by_project(&state.pool, id).await?;
    let visible = user
        .access
        .filter_by_discipline(links, |l| Some(l.discipline_code.as_str()));
    Ok(Json(DataResponse { data: visible }))
}

/// GET /api/v1/projects/{id}/documents
pub async fn list_documents(
    user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<Document>>>> {
    find_project(&state.pool, id).await?;
    let documents = DocumentRepo::list_by_project(&state.pool, id).await?;
    let visible = user
        .access
        .filter_by_discipline(documents, |d| Some(d.discipline_code.as_str()));
    Ok(Json(DataResponse { data: visible }))
}
