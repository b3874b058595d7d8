//! Folder and document creation and guarded reads.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use docvault_auth::{AuthorizationGuard, ScopeMode, ScopedAclStore, ScopedHierarchyStore};
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::{CreateDocument, Document};
use docvault_entity::folder::{CreateFolder, Folder};
use docvault_entity::permission::{AccessLevel, ResourceRef};

use crate::context::{RequestContext, require_access};

/// Request to create a folder.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateFolderRequest {
    /// Parent folder (None for a root folder).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    #[validate(length(min = 1, max = 255, message = "Folder name must be 1-255 characters"))]
    pub name: String,
}

/// Request to create a document.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    /// Containing folder.
    pub folder_id: FolderId,
    /// Document name.
    #[validate(length(min = 1, max = 255, message = "Document name must be 1-255 characters"))]
    pub name: String,
}

/// Creates and reads folders and documents on behalf of a user.
#[derive(Debug, Clone)]
pub struct ResourceService {
    hierarchy: ScopedHierarchyStore,
    acl: ScopedAclStore,
    guard: Arc<AuthorizationGuard>,
}

impl ResourceService {
    /// Creates a new resource service.
    pub fn new(
        hierarchy: ScopedHierarchyStore,
        acl: ScopedAclStore,
        guard: Arc<AuthorizationGuard>,
    ) -> Self {
        Self {
            hierarchy,
            acl,
            guard,
        }
    }

    /// Creates a folder.
    ///
    /// A child folder needs WRITE on its parent. A root folder needs nothing
    /// and is created together with a recursive ADMIN entry for its creator,
    /// since nothing above it could grant access.
    pub async fn create_folder(
        &self,
        ctx: &RequestContext,
        req: CreateFolderRequest,
    ) -> AppResult<Folder> {
        req.validate()?;

        let data = CreateFolder {
            organization_id: None,
            parent_id: req.parent_id,
            name: req.name,
        };
        let folder = match req.parent_id {
            Some(parent_id) => {
                require_access(
                    &self.guard,
                    ctx,
                    ResourceRef::Folder(parent_id),
                    AccessLevel::Write,
                )
                .await?;
                self.hierarchy
                    .create_folder(&ctx.tenant, ScopeMode::Scoped, data)
                    .await?
            }
            None => {
                let (folder, _owner_entry) = self
                    .acl
                    .create_root_folder(&ctx.tenant, ScopeMode::Scoped, data, ctx.user_id)
                    .await?;
                folder
            }
        };

        info!(
            user_id = %ctx.user_id,
            folder_id = %folder.id,
            parent_id = ?folder.parent_id,
            "Folder created"
        );
        Ok(folder)
    }

    /// Creates a document in a folder the caller can WRITE.
    pub async fn create_document(
        &self,
        ctx: &RequestContext,
        req: CreateDocumentRequest,
    ) -> AppResult<Document> {
        req.validate()?;
        require_access(&self.guard, ctx, ResourceRef::Folder(req.folder_id), AccessLevel::Write)
            .await?;

        let document = self
            .hierarchy
            .create_document(
                &ctx.tenant,
                ScopeMode::Scoped,
                CreateDocument {
                    organization_id: None,
                    folder_id: req.folder_id,
                    name: req.name,
                },
            )
            .await?;

        info!(
            user_id = %ctx.user_id,
            document_id = %document.id,
            folder_id = %document.folder_id,
            "Document created"
        );
        Ok(document)
    }

    /// Gets a folder the caller can READ.
    pub async fn get_folder(&self, ctx: &RequestContext, folder_id: FolderId) -> AppResult<Folder> {
        require_access(&self.guard, ctx, ResourceRef::Folder(folder_id), AccessLevel::Read).await?;
        self.hierarchy
            .get_folder(&ctx.tenant, ScopeMode::Scoped, folder_id)
            .await?
            .ok_or_else(AppError::forbidden)
    }

    /// Gets a document the caller can READ.
    pub async fn get_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<Document> {
        require_access(&self.guard, ctx, ResourceRef::Document(document_id), AccessLevel::Read)
            .await?;
        self.hierarchy
            .get_document(&ctx.tenant, ScopeMode::Scoped, document_id)
            .await?
            .ok_or_else(AppError::forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::config::AccessConfig;
    use docvault_core::error::ErrorKind;
    use docvault_core::types::{OrganizationId, UserId};
    use docvault_database::Stores;

    use crate::Services;

    const ACME: OrganizationId = OrganizationId::new(5);
    const GLOBEX: OrganizationId = OrganizationId::new(7);

    fn services() -> Services {
        Services::new(&Stores::in_memory(64), &AccessConfig::default())
    }

    fn ctx(user: i64, org: OrganizationId) -> RequestContext {
        RequestContext::from_identity(UserId::new(user), org).unwrap()
    }

    fn folder_req(parent_id: Option<FolderId>, name: &str) -> CreateFolderRequest {
        CreateFolderRequest {
            parent_id,
            name: name.into(),
        }
    }

    #[tokio::test]
    async fn test_root_folder_creator_becomes_admin() {
        let services = services();
        let owner = ctx(1, ACME);
        let root = services
            .resources
            .create_folder(&owner, folder_req(None, "Projects"))
            .await
            .unwrap();
        assert_eq!(root.organization_id, ACME);

        let entries = services
            .permissions
            .list_folder_entries(&owner, root.id)
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].user_id, owner.user_id);
        assert_eq!(entries[0].access_level, AccessLevel::Admin);
        assert!(entries[0].recursive);

        let child = services
            .resources
            .create_folder(&owner, folder_req(Some(root.id), "Q3"))
            .await
            .unwrap();
        let doc = services
            .resources
            .create_document(
                &owner,
                CreateDocumentRequest {
                    folder_id: child.id,
                    name: "plan.md".into(),
                },
            )
            .await
            .unwrap();

        let fetched = services.resources.get_document(&owner, doc.id).await.unwrap();
        assert_eq!(fetched.folder_id, child.id);
    }

    #[tokio::test]
    async fn test_child_creation_requires_write_on_parent() {
        let services = services();
        let root = services
            .resources
            .create_folder(&ctx(1, ACME), folder_req(None, "Projects"))
            .await
            .unwrap();

        let err = services
            .resources
            .create_folder(&ctx(2, ACME), folder_req(Some(root.id), "Sneaky"))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_other_tenant_cannot_read() {
        let services = services();
        let root = services
            .resources
            .create_folder(&ctx(1, ACME), folder_req(None, "Projects"))
            .await
            .unwrap();

        let err = services
            .resources
            .get_folder(&ctx(1, GLOBEX), root.id)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
    }

    #[tokio::test]
    async fn test_empty_name_is_rejected() {
        let services = services();
        let err = services
            .resources
            .create_folder(&ctx(1, ACME), folder_req(None, ""))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }
}
