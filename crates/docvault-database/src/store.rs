//! Storage port traits for the resource hierarchy and access-control entries.

use async_trait::async_trait;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::TenantScoped;
use docvault_core::types::{DocumentId, FolderId, OrganizationId, UserId};
use docvault_entity::document::{CreateDocument, Document};
use docvault_entity::folder::{AncestorEntry, CreateFolder, Folder};
use docvault_entity::permission::{DocumentAce, DocumentGrant, FolderAce, FolderGrant};

use crate::scope::TenantScope;

/// Folder and document lookups, pre-scoped to a tenant.
///
/// Rows outside `scope` behave exactly as if they did not exist.
#[async_trait]
pub trait HierarchyStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a folder by ID.
    async fn get_folder(&self, folder_id: FolderId, scope: &TenantScope)
    -> AppResult<Option<Folder>>;

    /// Ancestors of a folder, nearest parent first, root last.
    ///
    /// The folder itself is not included. Fails with an internal error if the
    /// chain is cyclic or deeper than the store's configured limit.
    async fn get_ancestor_chain(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Vec<AncestorEntry>>;

    /// Find a document by ID.
    async fn get_document(
        &self,
        document_id: DocumentId,
        scope: &TenantScope,
    ) -> AppResult<Option<Document>>;

    /// Persist a new folder. The payload must already carry its organization.
    async fn create_folder(&self, data: CreateFolder) -> AppResult<Folder>;

    /// Persist a new document. The payload must already carry its organization.
    async fn create_document(&self, data: CreateDocument) -> AppResult<Document>;
}

/// Access-control entry lookups and mutators.
///
/// At most one entry exists per `(resource, user)`: creation of a second one
/// fails with a conflict, updates replace in place, revocation deletes.
/// Creating or updating an entry on a resource that does not exist in the
/// payload's organization fails with the uniform not-found error.
#[async_trait]
pub trait AclStore: Send + Sync + std::fmt::Debug + 'static {
    /// The folder entry for `(folder_id, user_id)`, if any.
    async fn get_folder_ace(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<Option<FolderAce>>;

    /// All folder entries of `user_id` among `folder_ids`, in no particular order.
    async fn get_folder_aces_for_user_among_ids(
        &self,
        user_id: UserId,
        folder_ids: &[FolderId],
        scope: &TenantScope,
    ) -> AppResult<Vec<FolderAce>>;

    /// The document entry for `(document_id, user_id)`, if any.
    async fn get_document_ace(
        &self,
        document_id: DocumentId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<Option<DocumentAce>>;

    /// Every entry on a folder, oldest first.
    async fn list_folder_aces(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Vec<FolderAce>>;

    /// Every entry on a document, oldest first.
    async fn list_document_aces(
        &self,
        document_id: DocumentId,
        scope: &TenantScope,
    ) -> AppResult<Vec<DocumentAce>>;

    /// Create a folder entry; conflict if one already exists for the pair.
    async fn create_folder_ace(&self, grant: FolderGrant) -> AppResult<FolderAce>;

    /// Replace level and recursive flag of an existing folder entry.
    async fn update_folder_ace(&self, grant: FolderGrant) -> AppResult<FolderAce>;

    /// Delete a folder entry. Returns `true` if one was removed.
    async fn revoke_folder_ace(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<bool>;

    /// Create a document entry; conflict if one already exists for the pair.
    async fn create_document_ace(&self, grant: DocumentGrant) -> AppResult<DocumentAce>;

    /// Replace the level of an existing document entry.
    async fn update_document_ace(&self, grant: DocumentGrant) -> AppResult<DocumentAce>;

    /// Delete a document entry. Returns `true` if one was removed.
    async fn revoke_document_ace(
        &self,
        document_id: DocumentId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<bool>;

    /// Create a root folder and give `owner` a recursive ADMIN entry on it.
    ///
    /// Both rows are written or neither is.
    async fn create_root_folder(
        &self,
        data: CreateFolder,
        owner: UserId,
    ) -> AppResult<(Folder, FolderAce)>;
}

/// The organization a write payload is owned by.
///
/// Stores refuse payloads that reach them unstamped.
pub fn require_organization<E: TenantScoped>(entity: &E) -> AppResult<OrganizationId> {
    match entity.organization_id() {
        Some(org) if org.is_valid() => Ok(org),
        Some(org) => Err(AppError::invalid_context(format!(
            "Refusing to persist entity with organization id {org}"
        ))),
        None => Err(AppError::missing_tenant(
            "Refusing to persist entity without an organization",
        )),
    }
}
