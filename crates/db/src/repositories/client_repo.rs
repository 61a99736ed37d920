//! Repository for the `clients` table.

use sqlx::PgPool;

use crate::models::client::{Client, CreateClient};

const COLUMNS: &str = "id, name, created_at";

pub struct ClientRepo;

impl ClientRepo {
    pub async fn create(pool: &PgPool, input: &CreateClient) -> Result<Client, sqlx::Error> {
        let query = format!("INSERT INTO clients (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Client>(&query)
            .bind(input.name.trim())
            .fetch_one(pool)
            .await
    }

    /// List all clients ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Client>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM clients ORDER BY name");
        sqlx::query_as::<_, Client>(&query).fetch_all(pool).await
    }
}
