//! Nearest-ancestor permission resolution.
//!
//! Resolution rules:
//! - A direct entry on the queried resource wins outright, whatever its
//!   level or recursive flag. For documents this beats any folder grant.
//! - Otherwise the folder's ancestors are walked nearest-first. The first
//!   ancestor holding an entry for the user settles the outcome: a recursive
//!   entry is inherited, a non-recursive one blocks everything further up.
//! - A document without a direct entry resolves through its containing
//!   folder, and the result is always reported as inherited.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, OrganizationId, UserId};
use docvault_database::{AclStore, HierarchyStore, Stores};
use docvault_entity::folder::Folder;
use docvault_entity::permission::{EffectivePermission, FolderAce, ResourceRef};

use crate::tenant::{ScopeMode, ScopedAclStore, ScopedHierarchyStore, TenantContext};

/// Resolves what a user may do on a folder or document.
///
/// Holds no state between calls; every resolution reads the stores afresh.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    hierarchy: ScopedHierarchyStore,
    acl: ScopedAclStore,
}

impl PermissionResolver {
    /// Creates a resolver over the given stores.
    pub fn new(hierarchy: Arc<dyn HierarchyStore>, acl: Arc<dyn AclStore>) -> Self {
        Self {
            hierarchy: ScopedHierarchyStore::new(hierarchy),
            acl: ScopedAclStore::new(acl),
        }
    }

    /// Creates a resolver from a configured store pair.
    pub fn from_stores(stores: &Stores) -> Self {
        Self::new(Arc::clone(&stores.hierarchy), Arc::clone(&stores.acl))
    }

    /// Resolves the effective permission of `user_id` on `resource`.
    ///
    /// `Ok(None)` means no access. Fails with a not-found error when the
    /// resource is absent or owned by another organization, and with an
    /// invalid-context error for a non-positive `organization_id`.
    pub async fn resolve(
        &self,
        user_id: UserId,
        resource: ResourceRef,
        organization_id: OrganizationId,
    ) -> AppResult<Option<EffectivePermission>> {
        let ctx = TenantContext::for_organization(organization_id)?;
        let resolved = match resource {
            ResourceRef::Folder(folder_id) => self.resolve_folder(&ctx, user_id, folder_id).await?,
            ResourceRef::Document(document_id) => {
                self.resolve_document(&ctx, user_id, document_id).await?
            }
        };

        let outcome = resolved
            .as_ref()
            .map(EffectivePermission::describe)
            .unwrap_or_else(|| "none".to_string());
        debug!(
            user_id = %user_id,
            resource = %resource,
            organization_id = %organization_id,
            resolved = %outcome,
            "Resolved permission"
        );
        Ok(resolved)
    }

    async fn resolve_document(
        &self,
        ctx: &TenantContext,
        user_id: UserId,
        document_id: DocumentId,
    ) -> AppResult<Option<EffectivePermission>> {
        let document = self
            .hierarchy
            .get_document(ctx, ScopeMode::Scoped, document_id)
            .await?
            .ok_or_else(AppError::resource_not_found)?;

        if let Some(ace) = self
            .acl
            .get_document_ace(ctx, ScopeMode::Scoped, document_id, user_id)
            .await?
        {
            return Ok(Some(EffectivePermission::direct(
                ace.access_level,
                ResourceRef::Document(document_id),
            )));
        }

        let folder = self
            .hierarchy
            .get_folder(ctx, ScopeMode::Scoped, document.folder_id)
            .await?
            .ok_or_else(AppError::resource_not_found)?;

        let via_folder = self.resolve_loaded_folder(ctx, user_id, &folder).await?;
        Ok(via_folder.map(|permission| {
            if permission.inherited {
                permission
            } else {
                EffectivePermission::inherited(
                    permission.access_level,
                    permission.origin,
                    vec![folder.name.clone()],
                )
            }
        }))
    }

    async fn resolve_folder(
        &self,
        ctx: &TenantContext,
        user_id: UserId,
        folder_id: FolderId,
    ) -> AppResult<Option<EffectivePermission>> {
        let folder = self
            .hierarchy
            .get_folder(ctx, ScopeMode::Scoped, folder_id)
            .await?
            .ok_or_else(AppError::resource_not_found)?;
        self.resolve_loaded_folder(ctx, user_id, &folder).await
    }

    async fn resolve_loaded_folder(
        &self,
        ctx: &TenantContext,
        user_id: UserId,
        folder: &Folder,
    ) -> AppResult<Option<EffectivePermission>> {
        if let Some(ace) = self
            .acl
            .get_folder_ace(ctx, ScopeMode::Scoped, folder.id, user_id)
            .await?
        {
            return Ok(Some(EffectivePermission::direct(
                ace.access_level,
                ResourceRef::Folder(folder.id),
            )));
        }

        let chain = self
            .hierarchy
            .get_ancestor_chain(ctx, ScopeMode::Scoped, folder.id)
            .await?;
        if chain.is_empty() {
            return Ok(None);
        }

        let ancestor_ids: Vec<FolderId> = chain.iter().map(|a| a.id).collect();
        let aces: HashMap<FolderId, FolderAce> = self
            .acl
            .get_folder_aces_for_user_among_ids(ctx, ScopeMode::Scoped, user_id, &ancestor_ids)
            .await?
            .into_iter()
            .map(|ace| (ace.folder_id, ace))
            .collect();

        for (index, ancestor) in chain.iter().enumerate() {
            let Some(ace) = aces.get(&ancestor.id) else {
                continue;
            };

            if !ace.recursive {
                debug!(
                    folder_id = %folder.id,
                    blocking_folder_id = %ancestor.id,
                    depth = ancestor.depth,
                    "Inheritance blocked by non-recursive entry"
                );
                return Ok(None);
            }

            let mut label_path: Vec<String> = chain[..=index]
                .iter()
                .rev()
                .map(|a| a.name.clone())
                .collect();
            label_path.push(folder.name.clone());

            return Ok(Some(EffectivePermission::inherited(
                ace.access_level,
                ResourceRef::Folder(ancestor.id),
                label_path,
            )));
        }

        Ok(None)
    }
}
