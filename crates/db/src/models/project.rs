//! Project model and DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use doctrack_core::types::{DbId, Timestamp};

/// A project row joined with its client's name.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub location: Option<String>,
    pub client_id: Option<DbId>,
    pub client_name: Option<String>,
    pub client_project_code: Option<String>,
    pub internal_project_code: Option<i64>,
    pub contract_number: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub pem_date: Option<NaiveDate>,
    /// Derived: |pem_date - contract_start_date| in days.
    pub contract_duration_days: Option<i32>,
    pub hours_per_day: i32,
    pub days_per_week: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project. The contract duration is derived.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    pub location: Option<String>,
    pub client_id: Option<DbId>,
    pub client_project_code: Option<String>,
    pub internal_project_code: Option<i64>,
    pub contract_number: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub pem_date: Option<NaiveDate>,
    /// Defaults to 8.
    pub hours_per_day: Option<i32>,
    /// Defaults to 5.
    pub days_per_week: Option<i32>,
}

/// DTO for updating a project. Only non-`None` fields are applied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub name: Option<String>,
    pub location: Option<String>,
    pub client_id: Option<DbId>,
    pub client_project_code: Option<String>,
    pub internal_project_code: Option<i64>,
    pub contract_number: Option<String>,
    pub contract_start_date: Option<NaiveDate>,
    pub pem_date: Option<NaiveDate>,
    pub hours_per_day: Option<i32>,
    pub days_per_week: Option<i32>,
}
