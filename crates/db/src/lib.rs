//! PostgreSQL persistence for the document registry.
//!
//! - [`models`] -- row structs and DTOs.
//! - [`repositories`] -- zero-sized repos with async query methods.
//! - [`import_store`] -- the transactional store behind spreadsheet imports.

pub mod import_store;
pub mod models;
pub mod repositories;

use sqlx::postgres::PgPoolOptions;

pub use import_store::PgImportStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
