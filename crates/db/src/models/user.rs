//! User model, as needed for authorization.

use serde::Serialize;
use sqlx::FromRow;
use doctrack_core::types::DbId;

/// A user joined with its role name and discipline code.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserAccessRow {
    pub id: DbId,
    pub email: String,
    pub full_name: Option<String>,
    pub role_name: String,
    pub discipline_code: Option<String>,
}

/// DTO for inserting a user (seeding and tests).
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub full_name: Option<String>,
    pub role_id: DbId,
    pub discipline_id: Option<DbId>,
}
