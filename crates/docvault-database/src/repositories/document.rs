//! Document repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::DocumentId;
use docvault_entity::document::{CreateDocument, Document};

use crate::scope::TenantScope;
use crate::store::require_organization;

use super::map_write_error;

/// Repository for document lookups.
#[derive(Debug, Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    /// Create a new document repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a document by ID within a scope.
    pub async fn find_by_id(
        &self,
        id: DocumentId,
        scope: &TenantScope,
    ) -> AppResult<Option<Document>> {
        sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE id = $1 \
             AND ($2::BIGINT IS NULL OR organization_id = $2)",
        )
        .bind(id)
        .bind(scope.sql_filter())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find document", e))
    }

    /// Create a new document. The containing folder must belong to the same organization.
    pub async fn create(&self, data: &CreateDocument) -> AppResult<Document> {
        let organization_id = require_organization(data)?;
        sqlx::query_as::<_, Document>(
            "INSERT INTO documents (organization_id, folder_id, name) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(organization_id)
        .bind(data.folder_id)
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create document"))
    }
}
