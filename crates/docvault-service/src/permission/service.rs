//! ACL management: grant, update, revoke, list, and explain.

use std::sync::Arc;

use tracing::info;

use docvault_auth::{AuthorizationGuard, ScopeMode, ScopedAclStore};
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, UserId};
use docvault_entity::permission::{
    AccessLevel, DocumentAce, DocumentGrant, EffectivePermission, FolderAce, FolderGrant,
    ResourceRef,
};

use crate::context::{RequestContext, require_access};

/// Manages access-control entries on folders and documents.
///
/// Every mutation requires the actor to hold ADMIN on the target resource.
/// Payload organization ids are ignored; entries are always written into
/// the request tenant.
#[derive(Debug, Clone)]
pub struct PermissionService {
    acl: ScopedAclStore,
    guard: Arc<AuthorizationGuard>,
}

impl PermissionService {
    /// Creates a new permission service.
    pub fn new(acl: ScopedAclStore, guard: Arc<AuthorizationGuard>) -> Self {
        Self { acl, guard }
    }

    /// Grant a folder entry. Conflicts if the user already has one.
    pub async fn grant_folder(
        &self,
        ctx: &RequestContext,
        grant: FolderGrant,
    ) -> AppResult<FolderAce> {
        require_access(&self.guard, ctx, ResourceRef::Folder(grant.folder_id), AccessLevel::Admin)
            .await?;
        let ace = self
            .acl
            .create_folder_ace(&ctx.tenant, ScopeMode::Scoped, grant)
            .await?;

        info!(
            actor_id = %ctx.user_id,
            user_id = %ace.user_id,
            folder_id = %ace.folder_id,
            access_level = %ace.access_level,
            recursive = ace.recursive,
            "Folder access granted"
        );
        Ok(ace)
    }

    /// Replace the level and recursive flag of an existing folder entry.
    pub async fn update_folder(
        &self,
        ctx: &RequestContext,
        grant: FolderGrant,
    ) -> AppResult<FolderAce> {
        require_access(&self.guard, ctx, ResourceRef::Folder(grant.folder_id), AccessLevel::Admin)
            .await?;
        let ace = self
            .acl
            .update_folder_ace(&ctx.tenant, ScopeMode::Scoped, grant)
            .await?;

        info!(
            actor_id = %ctx.user_id,
            user_id = %ace.user_id,
            folder_id = %ace.folder_id,
            access_level = %ace.access_level,
            recursive = ace.recursive,
            "Folder access updated"
        );
        Ok(ace)
    }

    /// Remove a user's folder entry.
    pub async fn revoke_folder(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
        user_id: UserId,
    ) -> AppResult<()> {
        require_access(&self.guard, ctx, ResourceRef::Folder(folder_id), AccessLevel::Admin).await?;
        let removed = self
            .acl
            .revoke_folder_ace(&ctx.tenant, ScopeMode::Scoped, folder_id, user_id)
            .await?;
        if !removed {
            return Err(AppError::not_found("Access entry not found"));
        }

        info!(
            actor_id = %ctx.user_id,
            user_id = %user_id,
            folder_id = %folder_id,
            "Folder access revoked"
        );
        Ok(())
    }

    /// Grant a document entry. Conflicts if the user already has one.
    pub async fn grant_document(
        &self,
        ctx: &RequestContext,
        grant: DocumentGrant,
    ) -> AppResult<DocumentAce> {
        require_access(
            &self.guard,
            ctx,
            ResourceRef::Document(grant.document_id),
            AccessLevel::Admin,
        )
        .await?;
        let ace = self
            .acl
            .create_document_ace(&ctx.tenant, ScopeMode::Scoped, grant)
            .await?;

        info!(
            actor_id = %ctx.user_id,
            user_id = %ace.user_id,
            document_id = %ace.document_id,
            access_level = %ace.access_level,
            "Document access granted"
        );
        Ok(ace)
    }

    /// Replace the level of an existing document entry.
    pub async fn update_document(
        &self,
        ctx: &RequestContext,
        grant: DocumentGrant,
    ) -> AppResult<DocumentAce> {
        require_access(
            &self.guard,
            ctx,
            ResourceRef::Document(grant.document_id),
            AccessLevel::Admin,
        )
        .await?;
        let ace = self
            .acl
            .update_document_ace(&ctx.tenant, ScopeMode::Scoped, grant)
            .await?;

        info!(
            actor_id = %ctx.user_id,
            user_id = %ace.user_id,
            document_id = %ace.document_id,
            access_level = %ace.access_level,
            "Document access updated"
        );
        Ok(ace)
    }

    /// Remove a user's document entry.
    pub async fn revoke_document(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
        user_id: UserId,
    ) -> AppResult<()> {
        require_access(
            &self.guard,
            ctx,
            ResourceRef::Document(document_id),
            AccessLevel::Admin,
        )
        .await?;
        let removed = self
            .acl
            .revoke_document_ace(&ctx.tenant, ScopeMode::Scoped, document_id, user_id)
            .await?;
        if !removed {
            return Err(AppError::not_found("Access entry not found"));
        }

        info!(
            actor_id = %ctx.user_id,
            user_id = %user_id,
            document_id = %document_id,
            "Document access revoked"
        );
        Ok(())
    }

    /// Entries held directly on a folder, oldest first.
    pub async fn list_folder_entries(
        &self,
        ctx: &RequestContext,
        folder_id: FolderId,
    ) -> AppResult<Vec<FolderAce>> {
        require_access(&self.guard, ctx, ResourceRef::Folder(folder_id), AccessLevel::Admin).await?;
        self.acl
            .list_folder_aces(&ctx.tenant, ScopeMode::Scoped, folder_id)
            .await
    }

    /// Entries held directly on a document, oldest first.
    pub async fn list_document_entries(
        &self,
        ctx: &RequestContext,
        document_id: DocumentId,
    ) -> AppResult<Vec<DocumentAce>> {
        require_access(
            &self.guard,
            ctx,
            ResourceRef::Document(document_id),
            AccessLevel::Admin,
        )
        .await?;
        self.acl
            .list_document_aces(&ctx.tenant, ScopeMode::Scoped, document_id)
            .await
    }

    /// The effective permission of `user_id` on `resource`, with provenance.
    ///
    /// Anyone may explain their own access; explaining someone else's
    /// requires ADMIN on the resource.
    pub async fn explain(
        &self,
        ctx: &RequestContext,
        resource: ResourceRef,
        user_id: UserId,
    ) -> AppResult<Option<EffectivePermission>> {
        if user_id != ctx.user_id {
            require_access(&self.guard, ctx, resource, AccessLevel::Admin).await?;
        }
        self.guard
            .resolver()
            .resolve(user_id, resource, ctx.organization_id()?)
            .await
            .map_err(AppError::into_public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::config::AccessConfig;
    use docvault_core::error::{ErrorKind, FORBIDDEN_MESSAGE};
    use docvault_core::types::OrganizationId;
    use docvault_database::Stores;

    use crate::Services;
    use crate::resource::CreateFolderRequest;

    const ORG: OrganizationId = OrganizationId::new(5);
    const OWNER: UserId = UserId::new(1);
    const MEMBER: UserId = UserId::new(2);

    fn services() -> Services {
        Services::new(&Stores::in_memory(64), &AccessConfig::default())
    }

    fn ctx(user: UserId) -> RequestContext {
        RequestContext::from_identity(user, ORG).unwrap()
    }

    async fn root_folder(services: &Services) -> FolderId {
        services
            .resources
            .create_folder(
                &ctx(OWNER),
                CreateFolderRequest {
                    parent_id: None,
                    name: "Team".into(),
                },
            )
            .await
            .unwrap()
            .id
    }

    fn folder_grant(folder_id: FolderId, level: AccessLevel) -> FolderGrant {
        FolderGrant {
            organization_id: None,
            folder_id,
            user_id: MEMBER,
            access_level: level,
            recursive: true,
        }
    }

    #[tokio::test]
    async fn test_grant_update_revoke_cycle() {
        let services = services();
        let folder = root_folder(&services).await;
        let owner = ctx(OWNER);

        let ace = services
            .permissions
            .grant_folder(&owner, folder_grant(folder, AccessLevel::Read))
            .await
            .unwrap();
        assert_eq!(ace.organization_id, ORG);

        let dup = services
            .permissions
            .grant_folder(&owner, folder_grant(folder, AccessLevel::Write))
            .await
            .unwrap_err();
        assert_eq!(dup.kind, ErrorKind::Conflict);

        let updated = services
            .permissions
            .update_folder(&owner, folder_grant(folder, AccessLevel::Write))
            .await
            .unwrap();
        assert_eq!(updated.id, ace.id);
        assert_eq!(updated.access_level, AccessLevel::Write);

        services
            .permissions
            .revoke_folder(&owner, folder, MEMBER)
            .await
            .unwrap();
        let again = services
            .permissions
            .revoke_folder(&owner, folder, MEMBER)
            .await
            .unwrap_err();
        assert_eq!(again.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_non_admin_cannot_grant() {
        let services = services();
        let folder = root_folder(&services).await;
        services
            .permissions
            .grant_folder(&ctx(OWNER), folder_grant(folder, AccessLevel::Write))
            .await
            .unwrap();

        let err = services
            .permissions
            .grant_folder(
                &ctx(MEMBER),
                FolderGrant {
                    user_id: UserId::new(3),
                    ..folder_grant(folder, AccessLevel::Read)
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, FORBIDDEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_unknown_resource_looks_forbidden() {
        let services = services();
        let err = services
            .permissions
            .grant_folder(&ctx(OWNER), folder_grant(FolderId::new(404), AccessLevel::Read))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);
        assert_eq!(err.message, FORBIDDEN_MESSAGE);
    }

    #[tokio::test]
    async fn test_explain() {
        let services = services();
        let folder = root_folder(&services).await;
        services
            .permissions
            .grant_folder(&ctx(OWNER), folder_grant(folder, AccessLevel::Read))
            .await
            .unwrap();

        let own = services
            .permissions
            .explain(&ctx(MEMBER), ResourceRef::Folder(folder), MEMBER)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(own.access_level, AccessLevel::Read);

        let err = services
            .permissions
            .explain(&ctx(MEMBER), ResourceRef::Folder(folder), OWNER)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Authorization);

        let listed = services
            .permissions
            .list_folder_entries(&ctx(OWNER), folder)
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);
    }
}
