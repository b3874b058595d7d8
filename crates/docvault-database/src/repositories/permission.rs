//! ACL repository implementation.

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::{AppError, ErrorKind};
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, UserId};
use docvault_entity::folder::{CreateFolder, Folder};
use docvault_entity::permission::{AccessLevel, DocumentAce, DocumentGrant, FolderAce, FolderGrant};

use crate::scope::TenantScope;
use crate::store::{AclStore, require_organization};

use super::map_write_error;

/// Repository for folder and document access-control entries.
///
/// The `(resource, user)` uniqueness is enforced by the table constraints;
/// creation uses `ON CONFLICT DO NOTHING` so concurrent grants of the same
/// pair resolve to exactly one row and one conflict.
#[derive(Debug, Clone)]
pub struct AclRepository {
    pool: PgPool,
}

impl AclRepository {
    /// Create a new ACL repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AclStore for AclRepository {
    async fn get_folder_ace(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<Option<FolderAce>> {
        sqlx::query_as::<_, FolderAce>(
            "SELECT * FROM folder_acl WHERE folder_id = $1 AND user_id = $2 \
             AND ($3::BIGINT IS NULL OR organization_id = $3)",
        )
        .bind(folder_id)
        .bind(user_id)
        .bind(scope.sql_filter())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find folder ACL", e))
    }

    async fn get_folder_aces_for_user_among_ids(
        &self,
        user_id: UserId,
        folder_ids: &[FolderId],
        scope: &TenantScope,
    ) -> AppResult<Vec<FolderAce>> {
        if folder_ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = folder_ids.iter().map(|id| id.get()).collect();
        sqlx::query_as::<_, FolderAce>(
            "SELECT * FROM folder_acl WHERE user_id = $1 AND folder_id = ANY($2) \
             AND ($3::BIGINT IS NULL OR organization_id = $3)",
        )
        .bind(user_id)
        .bind(ids)
        .bind(scope.sql_filter())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find ancestor ACLs", e)
        })
    }

    async fn get_document_ace(
        &self,
        document_id: DocumentId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<Option<DocumentAce>> {
        sqlx::query_as::<_, DocumentAce>(
            "SELECT * FROM document_acl WHERE document_id = $1 AND user_id = $2 \
             AND ($3::BIGINT IS NULL OR organization_id = $3)",
        )
        .bind(document_id)
        .bind(user_id)
        .bind(scope.sql_filter())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find document ACL", e)
        })
    }

    async fn list_folder_aces(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Vec<FolderAce>> {
        sqlx::query_as::<_, FolderAce>(
            "SELECT * FROM folder_acl WHERE folder_id = $1 \
             AND ($2::BIGINT IS NULL OR organization_id = $2) ORDER BY created_at ASC, id ASC",
        )
        .bind(folder_id)
        .bind(scope.sql_filter())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list folder ACL", e))
    }

    async fn list_document_aces(
        &self,
        document_id: DocumentId,
        scope: &TenantScope,
    ) -> AppResult<Vec<DocumentAce>> {
        sqlx::query_as::<_, DocumentAce>(
            "SELECT * FROM document_acl WHERE document_id = $1 \
             AND ($2::BIGINT IS NULL OR organization_id = $2) ORDER BY created_at ASC, id ASC",
        )
        .bind(document_id)
        .bind(scope.sql_filter())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to list document ACL", e)
        })
    }

    async fn create_folder_ace(&self, grant: FolderGrant) -> AppResult<FolderAce> {
        let organization_id = require_organization(&grant)?;
        sqlx::query_as::<_, FolderAce>(
            "INSERT INTO folder_acl (folder_id, user_id, organization_id, access_level, recursive) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (folder_id, user_id) DO NOTHING RETURNING *",
        )
        .bind(grant.folder_id)
        .bind(grant.user_id)
        .bind(organization_id)
        .bind(grant.access_level)
        .bind(grant.recursive)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create folder ACL"))?
        .ok_or_else(|| {
            AppError::conflict(format!(
                "User {} already has an entry on folder {}",
                grant.user_id, grant.folder_id
            ))
        })
    }

    async fn update_folder_ace(&self, grant: FolderGrant) -> AppResult<FolderAce> {
        let organization_id = require_organization(&grant)?;
        sqlx::query_as::<_, FolderAce>(
            "UPDATE folder_acl SET access_level = $4, recursive = $5, updated_at = NOW() \
             WHERE folder_id = $1 AND user_id = $2 AND organization_id = $3 RETURNING *",
        )
        .bind(grant.folder_id)
        .bind(grant.user_id)
        .bind(organization_id)
        .bind(grant.access_level)
        .bind(grant.recursive)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update folder ACL"))?
        .ok_or_else(|| AppError::not_found("Access entry not found"))
    }

    async fn revoke_folder_ace(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM folder_acl WHERE folder_id = $1 AND user_id = $2 \
             AND ($3::BIGINT IS NULL OR organization_id = $3)",
        )
        .bind(folder_id)
        .bind(user_id)
        .bind(scope.sql_filter())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to revoke folder ACL", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_document_ace(&self, grant: DocumentGrant) -> AppResult<DocumentAce> {
        let organization_id = require_organization(&grant)?;
        sqlx::query_as::<_, DocumentAce>(
            "INSERT INTO document_acl (document_id, user_id, organization_id, access_level) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (document_id, user_id) DO NOTHING RETURNING *",
        )
        .bind(grant.document_id)
        .bind(grant.user_id)
        .bind(organization_id)
        .bind(grant.access_level)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to create document ACL"))?
        .ok_or_else(|| {
            AppError::conflict(format!(
                "User {} already has an entry on document {}",
                grant.user_id, grant.document_id
            ))
        })
    }

    async fn update_document_ace(&self, grant: DocumentGrant) -> AppResult<DocumentAce> {
        let organization_id = require_organization(&grant)?;
        sqlx::query_as::<_, DocumentAce>(
            "UPDATE document_acl SET access_level = $4, updated_at = NOW() \
             WHERE document_id = $1 AND user_id = $2 AND organization_id = $3 RETURNING *",
        )
        .bind(grant.document_id)
        .bind(grant.user_id)
        .bind(organization_id)
        .bind(grant.access_level)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(e, "Failed to update document ACL"))?
        .ok_or_else(|| AppError::not_found("Access entry not found"))
    }

    async fn revoke_document_ace(
        &self,
        document_id: DocumentId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "DELETE FROM document_acl WHERE document_id = $1 AND user_id = $2 \
             AND ($3::BIGINT IS NULL OR organization_id = $3)",
        )
        .bind(document_id)
        .bind(user_id)
        .bind(scope.sql_filter())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to revoke document ACL", e)
        })?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_root_folder(
        &self,
        data: CreateFolder,
        owner: UserId,
    ) -> AppResult<(Folder, FolderAce)> {
        let organization_id = require_organization(&data)?;
        if data.parent_id.is_some() {
            return Err(AppError::validation("A root folder cannot have a parent"));
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let folder = sqlx::query_as::<_, Folder>(
            "INSERT INTO folders (organization_id, parent_id, name) \
             VALUES ($1, NULL, $2) RETURNING *",
        )
        .bind(organization_id)
        .bind(&data.name)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create folder"))?;

        let ace = sqlx::query_as::<_, FolderAce>(
            "INSERT INTO folder_acl (folder_id, user_id, organization_id, access_level, recursive) \
             VALUES ($1, $2, $3, $4, TRUE) RETURNING *",
        )
        .bind(folder.id)
        .bind(owner)
        .bind(organization_id)
        .bind(AccessLevel::Admin)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_write_error(e, "Failed to create owner ACL"))?;

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit root folder", e)
        })?;
        Ok((folder, ace))
    }
}
