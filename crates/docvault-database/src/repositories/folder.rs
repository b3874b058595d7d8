//! Folder repository implementation.

use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::FolderId;
use docvault_entity::folder::{AncestorEntry, CreateFolder, Folder};

use crate::scope::TenantScope;
use crate::store::require_organization;

use super::map_write_error;

/// Repository for folder lookups and tree queries.
#[derive(Debug, Clone)]
pub struct FolderRepository {
    pool: PgPool,
}

impl FolderRepository {
    /// Create a new folder repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a folder by ID within a scope.
    pub async fn find_by_id(&self, id: FolderId, scope: &TenantScope) -> AppResult<Option<Folder>> {
        sqlx::query_as::<_, Folder>(
            "SELECT * FROM folders WHERE id = $1 \
             AND ($2::BIGINT IS NULL OR organization_id = $2)",
        )
        .bind(id)
        .bind(scope.sql_filter())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder", e))
    }

    /// Get the ancestor chain of a folder, nearest parent first.
    ///
    /// Returns at most `limit + 1` rows so the caller can tell an over-deep
    /// (or cyclic) hierarchy apart from one that exactly fits.
    pub async fn find_ancestors(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
        limit: usize,
    ) -> AppResult<Vec<AncestorEntry>> {
        let limit = i32::try_from(limit).unwrap_or(i32::MAX - 1);
        sqlx::query_as::<_, AncestorEntry>(
            "WITH RECURSIVE ancestors AS ( \
                SELECT p.id, p.parent_id, p.name, 1 AS depth \
                FROM folders f INNER JOIN folders p ON p.id = f.parent_id \
                WHERE f.id = $1 \
                AND ($2::BIGINT IS NULL OR f.organization_id = $2) \
                AND ($2::BIGINT IS NULL OR p.organization_id = $2) \
                UNION ALL \
                SELECT p.id, p.parent_id, p.name, a.depth + 1 \
                FROM folders p INNER JOIN ancestors a ON p.id = a.parent_id \
                WHERE a.depth <= $3 \
                AND ($2::BIGINT IS NULL OR p.organization_id = $2) \
             ) SELECT id, name, depth FROM ancestors ORDER BY depth ASC",
        )
        .bind(folder_id)
        .bind(scope.sql_filter())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find ancestors", e))
    }

    /// Create a new folder.
    pub async fn create(&self, data: &CreateFolder) -> AppResult<Folder> {
        let organization_id = require_organization(data)?;
        sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (organization_id, parent_id, name) \
             VALUES ($1, $2, $3) RETURNING *",
        )
        .bind(organization_id)
        .bind(data.parent_id)
        .bind(&data.name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create folder"))
    }
}
