//! Repositories for the `disciplines` and `document_types` lookup tables.
//!
//! Codes are stored upper-cased and trimmed; lookups compare the same way.

use sqlx::PgPool;
use doctrack_core::types::DbId;

use crate::models::lookup::{CreateLookup, Discipline, DocumentType};

const COLUMNS: &str = "id, code, description";

pub struct DisciplineRepo;

impl DisciplineRepo {
    pub async fn create(pool: &PgPool, input: &CreateLookup) -> Result<Discipline, sqlx::Error> {
        let query = format!(
            "INSERT INTO disciplines (code, description) VALUES (UPPER(TRIM($1)), $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Discipline>(&query)
            .bind(&input.code)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List all disciplines ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<Discipline>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM disciplines ORDER BY code");
        sqlx::query_as::<_, Discipline>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Discipline>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM disciplines WHERE id = $1");
        sqlx::query_as::<_, Discipline>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}

pub struct DocumentTypeRepo;

impl DocumentTypeRepo {
    pub async fn create(pool: &PgPool, input: &CreateLookup) -> Result<DocumentType, sqlx::Error> {
        let query = format!(
            "INSERT INTO document_types (code, description) VALUES (UPPER(TRIM($1)), $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, DocumentType>(&query)
            .bind(&input.code)
            .bind(&input.description)
            .fetch_one(pool)
            .await
    }

    /// List all document types ordered by code.
    pub async fn list(pool: &PgPool) -> Result<Vec<DocumentType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_types ORDER BY code");
        sqlx::query_as::<_, DocumentType>(&query).fetch_all(pool).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DocumentType>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM document_types WHERE id = $1");
        sqlx::query_as::<_, DocumentType>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
