//! Repository for the `users` table.

use sqlx::PgPool;
use doctrack_core::types::DbId;

use crate::models::user::{CreateUser, UserAccessRow};

const ACCESS_COLUMNS: &str = "u.id, u.email, u.full_name, r.name AS role_name, d.code AS discipline_code";

pub struct UserRepo;

impl UserRepo {
    /// Insert a user, returning the generated ID.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO users (email, full_name, role_id, discipline_id) \
             VALUES (LOWER(TRIM($1)), $2, $3, $4) \
             RETURNING id",
        )
        .bind(&input.email)
        .bind(&input.full_name)
        .bind(input.role_id)
        .bind(input.discipline_id)
        .fetch_one(pool)
        .await
    }

    /// Find a user by e-mail (case-insensitive) with role name and discipline.
    pub async fn find_access_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<UserAccessRow>, sqlx::Error> {
        let query = format!(
            "SELECT {ACCESS_COLUMNS} FROM users u \
             JOIN roles r ON r.id = u.role_id \
             LEFT JOIN disciplines d ON d.id = u.discipline_id \
             WHERE u.email = LOWER(TRIM($1))"
        );
        sqlx::query_as::<_, UserAccessRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Look up a role's ID by its exact name.
    pub async fn role_id_by_name(pool: &PgPool, name: &str) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
            .bind(name)
            .fetch_optional(pool)
            .await
    }
}
