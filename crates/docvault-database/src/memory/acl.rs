//! In-memory [`AclStore`].

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{AceId, DocumentId, FolderId, UserId};
use docvault_entity::folder::{CreateFolder, Folder};
use docvault_entity::permission::{AccessLevel, DocumentAce, DocumentGrant, FolderAce, FolderGrant};

use crate::scope::TenantScope;
use crate::store::{AclStore, HierarchyStore, require_organization};

use super::hierarchy::MemoryHierarchyStore;

/// Access entries keyed by `(resource, user)`.
///
/// The map key is the uniqueness constraint; `entry()` holds the shard lock
/// for the duration of an insert-if-absent, so racing grants on one pair
/// produce exactly one row. Writes are checked against the hierarchy so an
/// entry can only point at a resource of its own organization.
#[derive(Debug)]
pub struct MemoryAclStore {
    hierarchy: Arc<MemoryHierarchyStore>,
    folder_aces: DashMap<(FolderId, UserId), FolderAce>,
    document_aces: DashMap<(DocumentId, UserId), DocumentAce>,
    next_id: AtomicI64,
}

impl MemoryAclStore {
    /// Create an empty store over the hierarchy its entries refer to.
    pub fn new(hierarchy: Arc<MemoryHierarchyStore>) -> Self {
        Self {
            hierarchy,
            folder_aces: DashMap::new(),
            document_aces: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> AceId {
        AceId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn require_folder(&self, grant: &FolderGrant) -> AppResult<()> {
        let organization_id = require_organization(grant)?;
        if self.hierarchy.owns_folder(grant.folder_id, organization_id) {
            Ok(())
        } else {
            Err(AppError::resource_not_found())
        }
    }

    fn require_document(&self, grant: &DocumentGrant) -> AppResult<()> {
        let organization_id = require_organization(grant)?;
        if self.hierarchy.owns_document(grant.document_id, organization_id) {
            Ok(())
        } else {
            Err(AppError::resource_not_found())
        }
    }
}

#[async_trait]
impl AclStore for MemoryAclStore {
    async fn get_folder_ace(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<Option<FolderAce>> {
        Ok(self
            .folder_aces
            .get(&(folder_id, user_id))
            .map(|ace| ace.value().clone())
            .filter(|ace| scope.permits(ace.organization_id)))
    }

    async fn get_folder_aces_for_user_among_ids(
        &self,
        user_id: UserId,
        folder_ids: &[FolderId],
        scope: &TenantScope,
    ) -> AppResult<Vec<FolderAce>> {
        Ok(folder_ids
            .iter()
            .filter_map(|folder_id| {
                self.folder_aces
                    .get(&(*folder_id, user_id))
                    .map(|ace| ace.value().clone())
            })
            .filter(|ace| scope.permits(ace.organization_id))
            .collect())
    }

    async fn get_document_ace(
        &self,
        document_id: DocumentId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<Option<DocumentAce>> {
        Ok(self
            .document_aces
            .get(&(document_id, user_id))
            .map(|ace| ace.value().clone())
            .filter(|ace| scope.permits(ace.organization_id)))
    }

    async fn list_folder_aces(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Vec<FolderAce>> {
        let mut aces: Vec<FolderAce> = self
            .folder_aces
            .iter()
            .filter(|e| e.key().0 == folder_id && scope.permits(e.value().organization_id))
            .map(|e| e.value().clone())
            .collect();
        aces.sort_by_key(|ace| (ace.created_at, ace.id));
        Ok(aces)
    }

    async fn list_document_aces(
        &self,
        document_id: DocumentId,
        scope: &TenantScope,
    ) -> AppResult<Vec<DocumentAce>> {
        let mut aces: Vec<DocumentAce> = self
            .document_aces
            .iter()
            .filter(|e| e.key().0 == document_id && scope.permits(e.value().organization_id))
            .map(|e| e.value().clone())
            .collect();
        aces.sort_by_key(|ace| (ace.created_at, ace.id));
        Ok(aces)
    }

    async fn create_folder_ace(&self, grant: FolderGrant) -> AppResult<FolderAce> {
        let organization_id = require_organization(&grant)?;
        self.require_folder(&grant)?;
        match self.folder_aces.entry((grant.folder_id, grant.user_id)) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "User {} already has an entry on folder {}",
                grant.user_id, grant.folder_id
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let ace = FolderAce {
                    id: self.allocate_id(),
                    folder_id: grant.folder_id,
                    user_id: grant.user_id,
                    organization_id,
                    access_level: grant.access_level,
                    recursive: grant.recursive,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(ace.clone());
                Ok(ace)
            }
        }
    }

    async fn update_folder_ace(&self, grant: FolderGrant) -> AppResult<FolderAce> {
        let organization_id = require_organization(&grant)?;
        self.require_folder(&grant)?;
        let mut ace = self
            .folder_aces
            .get_mut(&(grant.folder_id, grant.user_id))
            .filter(|ace| ace.organization_id == organization_id)
            .ok_or_else(|| AppError::not_found("Access entry not found"))?;
        ace.access_level = grant.access_level;
        ace.recursive = grant.recursive;
        ace.updated_at = Utc::now();
        Ok(ace.clone())
    }

    async fn revoke_folder_ace(
        &self,
        folder_id: FolderId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<bool> {
        Ok(self
            .folder_aces
            .remove_if(&(folder_id, user_id), |_, ace| {
                scope.permits(ace.organization_id)
            })
            .is_some())
    }

    async fn create_document_ace(&self, grant: DocumentGrant) -> AppResult<DocumentAce> {
        let organization_id = require_organization(&grant)?;
        self.require_document(&grant)?;
        match self.document_aces.entry((grant.document_id, grant.user_id)) {
            Entry::Occupied(_) => Err(AppError::conflict(format!(
                "User {} already has an entry on document {}",
                grant.user_id, grant.document_id
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let ace = DocumentAce {
                    id: self.allocate_id(),
                    document_id: grant.document_id,
                    user_id: grant.user_id,
                    organization_id,
                    access_level: grant.access_level,
                    created_at: now,
                    updated_at: now,
                };
                slot.insert(ace.clone());
                Ok(ace)
            }
        }
    }

    async fn update_document_ace(&self, grant: DocumentGrant) -> AppResult<DocumentAce> {
        let organization_id = require_organization(&grant)?;
        self.require_document(&grant)?;
        let mut ace = self
            .document_aces
            .get_mut(&(grant.document_id, grant.user_id))
            .filter(|ace| ace.organization_id == organization_id)
            .ok_or_else(|| AppError::not_found("Access entry not found"))?;
        ace.access_level = grant.access_level;
        ace.updated_at = Utc::now();
        Ok(ace.clone())
    }

    async fn revoke_document_ace(
        &self,
        document_id: DocumentId,
        user_id: UserId,
        scope: &TenantScope,
    ) -> AppResult<bool> {
        Ok(self
            .document_aces
            .remove_if(&(document_id, user_id), |_, ace| {
                scope.permits(ace.organization_id)
            })
            .is_some())
    }

    async fn create_root_folder(
        &self,
        data: CreateFolder,
        owner: UserId,
    ) -> AppResult<(Folder, FolderAce)> {
        if data.parent_id.is_some() {
            return Err(AppError::validation("A root folder cannot have a parent"));
        }
        let folder = self.hierarchy.create_folder(data).await?;
        let ace = FolderAce {
            id: self.allocate_id(),
            folder_id: folder.id,
            user_id: owner,
            organization_id: folder.organization_id,
            access_level: AccessLevel::Admin,
            recursive: true,
            created_at: folder.created_at,
            updated_at: folder.created_at,
        };
        // Fresh folder id, so the slot is always vacant.
        self.folder_aces.insert((folder.id, owner), ace.clone());
        Ok((folder, ace))
    }
}
