//! PostgreSQL implementation of the import pipeline's store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use doctrack_core::import::{
    DisciplineLink, ImportStore, ImportTransaction, LookupEntry, NewDocument, StoreError,
};
use doctrack_core::types::DbId;

use crate::repositories::{DisciplineRepo, DocumentRepo, DocumentTypeRepo, ProjectDisciplineRepo};

/// PostgreSQL error code for unique-constraint violations.
const UNIQUE_VIOLATION: &str = "23505";

/// Map a sqlx error into the store's error type, keeping unique-constraint
/// violations distinguishable.
pub fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            return StoreError::UniqueViolation(constraint);
        }
        return StoreError::Backend(db_err.message().to_string());
    }
    StoreError::Backend(err.to_string())
}

fn links(rows: Vec<crate::models::project_discipline::ProjectDiscipline>) -> Vec<DisciplineLink> {
    rows.into_iter()
        .map(|pd| DisciplineLink {
            id: pd.id,
            discipline_id: pd.discipline_id,
            discipline_code: pd.discipline_code,
        })
        .collect()
}

/// Import store backed by a connection pool.
#[derive(Clone)]
pub struct PgImportStore {
    pool: PgPool,
}

impl PgImportStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ImportStore for PgImportStore {
    async fn disciplines(&self) -> Result<Vec<LookupEntry>, StoreError> {
        let rows = DisciplineRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows
            .into_iter()
            .map(|d| LookupEntry { id: d.id, code: d.code })
            .collect())
    }

    async fn document_types(&self) -> Result<Vec<LookupEntry>, StoreError> {
        let rows = DocumentTypeRepo::list(&self.pool).await.map_err(store_error)?;
        Ok(rows
            .into_iter()
            .map(|t| LookupEntry { id: t.id, code: t.code })
            .collect())
    }

    async fn project_disciplines(&self, project_id: DbId) -> Result<Vec<DisciplineLink>, StoreError> {
        ProjectDisciplineRepo::list_by_project(&self.pool, project_id)
            .await
            .map(links)
            .map_err(store_error)
    }

    async fn base_codes(&self, project_id: DbId) -> Result<Vec<String>, StoreError> {
        DocumentRepo::base_codes(&self.pool, project_id)
            .await
            .map_err(store_error)
    }

    async fn begin(&self) -> Result<Box<dyn ImportTransaction>, StoreError> {
        let tx = self.pool.begin().await.map_err(store_error)?;
        Ok(Box::new(PgImportTransaction { tx }))
    }
}

/// An open import transaction. Dropped without commit, it rolls back.
pub struct PgImportTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ImportTransaction for PgImportTransaction {
    async fn link_disciplines(
        &mut self,
        project_id: DbId,
        discipline_ids: &[DbId],
    ) -> Result<Vec<DisciplineLink>, StoreError> {
        let created = ProjectDisciplineRepo::link_many(&mut *self.tx, project_id, discipline_ids)
            .await
            .map_err(store_error)?;
        tracing::debug!(project_id, created, "Linked disciplines to project");

        ProjectDisciplineRepo::list_by_project(&mut *self.tx, project_id)
            .await
            .map(links)
            .map_err(store_error)
    }

    async fn insert_documents(&mut self, project_id: DbId, documents: &[NewDocument]) -> Result<u64, StoreError> {
        DocumentRepo::insert_batch(&mut *self.tx, project_id, documents)
            .await
            .map_err(store_error)
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx.commit().await.map_err(store_error)
    }
}
