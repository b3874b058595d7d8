//! Store decorators that apply [`TenantEnforcer`] to every call.
//!
//! Everything above the storage layer talks to these wrappers instead of the
//! raw ports, so no read can leave without a tenant predicate and no write
//! can reach storage unstamped.

use std::sync::Arc;

use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, UserId};
use docvault_database::{AclStore, HierarchyStore};
use docvault_entity::document::{CreateDocument, Document};
use docvault_entity::folder::{AncestorEntry, CreateFolder, Folder};
use docvault_entity::permission::{DocumentAce, DocumentGrant, FolderAce, FolderGrant};

use super::context::TenantContext;
use super::enforcer::{ScopeMode, TenantEnforcer};

/// Tenant-enforcing view over a [`HierarchyStore`].
#[derive(Debug, Clone)]
pub struct ScopedHierarchyStore {
    inner: Arc<dyn HierarchyStore>,
}

impl ScopedHierarchyStore {
    /// Wrap a raw hierarchy store.
    pub fn new(inner: Arc<dyn HierarchyStore>) -> Self {
        Self { inner }
    }

    /// A folder visible to the resolved scope.
    pub async fn get_folder(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        folder_id: FolderId,
    ) -> AppResult<Option<Folder>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.get_folder(folder_id, &scope).await
    }

    /// Ancestors of a folder within the resolved scope, nearest first.
    pub async fn get_ancestor_chain(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        folder_id: FolderId,
    ) -> AppResult<Vec<AncestorEntry>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.get_ancestor_chain(folder_id, &scope).await
    }

    /// A document visible to the resolved scope.
    pub async fn get_document(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        document_id: DocumentId,
    ) -> AppResult<Option<Document>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.get_document(document_id, &scope).await
    }

    /// Stamp and persist a folder.
    pub async fn create_folder(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        data: CreateFolder,
    ) -> AppResult<Folder> {
        let data = TenantEnforcer::stamp(ctx, mode, data)?;
        self.inner.create_folder(data).await
    }

    /// Stamp and persist a document.
    pub async fn create_document(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        data: CreateDocument,
    ) -> AppResult<Document> {
        let data = TenantEnforcer::stamp(ctx, mode, data)?;
        self.inner.create_document(data).await
    }
}

/// Tenant-enforcing view over an [`AclStore`].
#[derive(Debug, Clone)]
pub struct ScopedAclStore {
    inner: Arc<dyn AclStore>,
}

impl ScopedAclStore {
    /// Wrap a raw ACL store.
    pub fn new(inner: Arc<dyn AclStore>) -> Self {
        Self { inner }
    }

    /// The user's entry on a folder, if visible.
    pub async fn get_folder_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        folder_id: FolderId,
        user_id: UserId,
    ) -> AppResult<Option<FolderAce>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.get_folder_ace(folder_id, user_id, &scope).await
    }

    /// The user's visible entries among `folder_ids`.
    pub async fn get_folder_aces_for_user_among_ids(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        user_id: UserId,
        folder_ids: &[FolderId],
    ) -> AppResult<Vec<FolderAce>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner
            .get_folder_aces_for_user_among_ids(user_id, folder_ids, &scope)
            .await
    }

    /// The user's entry on a document, if visible.
    pub async fn get_document_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        document_id: DocumentId,
        user_id: UserId,
    ) -> AppResult<Option<DocumentAce>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.get_document_ace(document_id, user_id, &scope).await
    }

    /// Visible entries on a folder, oldest first.
    pub async fn list_folder_aces(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        folder_id: FolderId,
    ) -> AppResult<Vec<FolderAce>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.list_folder_aces(folder_id, &scope).await
    }

    /// Visible entries on a document, oldest first.
    pub async fn list_document_aces(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        document_id: DocumentId,
    ) -> AppResult<Vec<DocumentAce>> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.list_document_aces(document_id, &scope).await
    }

    /// Stamp and create a folder entry.
    pub async fn create_folder_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        grant: FolderGrant,
    ) -> AppResult<FolderAce> {
        let grant = TenantEnforcer::stamp(ctx, mode, grant)?;
        self.inner.create_folder_ace(grant).await
    }

    /// Stamp and replace a folder entry.
    pub async fn update_folder_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        grant: FolderGrant,
    ) -> AppResult<FolderAce> {
        let grant = TenantEnforcer::stamp(ctx, mode, grant)?;
        self.inner.update_folder_ace(grant).await
    }

    /// Remove a visible folder entry. Returns `true` if one was removed.
    pub async fn revoke_folder_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        folder_id: FolderId,
        user_id: UserId,
    ) -> AppResult<bool> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner.revoke_folder_ace(folder_id, user_id, &scope).await
    }

    /// Stamp and create a document entry.
    pub async fn create_document_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        grant: DocumentGrant,
    ) -> AppResult<DocumentAce> {
        let grant = TenantEnforcer::stamp(ctx, mode, grant)?;
        self.inner.create_document_ace(grant).await
    }

    /// Stamp and replace a document entry.
    pub async fn update_document_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        grant: DocumentGrant,
    ) -> AppResult<DocumentAce> {
        let grant = TenantEnforcer::stamp(ctx, mode, grant)?;
        self.inner.update_document_ace(grant).await
    }

    /// Remove a visible document entry. Returns `true` if one was removed.
    pub async fn revoke_document_ace(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        document_id: DocumentId,
        user_id: UserId,
    ) -> AppResult<bool> {
        let scope = TenantEnforcer::read_scope(ctx, mode)?;
        self.inner
            .revoke_document_ace(document_id, user_id, &scope)
            .await
    }

    /// Stamp a root folder and create it together with `owner`'s ADMIN entry.
    pub async fn create_root_folder(
        &self,
        ctx: &TenantContext,
        mode: ScopeMode,
        data: CreateFolder,
        owner: UserId,
    ) -> AppResult<(Folder, FolderAce)> {
        let data = TenantEnforcer::stamp(ctx, mode, data)?;
        self.inner.create_root_folder(data, owner).await
    }
}
