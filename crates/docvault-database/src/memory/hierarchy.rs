//! In-memory [`HierarchyStore`].

use std::collections::HashSet;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId, OrganizationId};
use docvault_entity::document::{CreateDocument, Document};
use docvault_entity::folder::{AncestorEntry, CreateFolder, Folder};

use crate::scope::TenantScope;
use crate::store::{HierarchyStore, require_organization};

/// Folder and document tables held in concurrent maps.
#[derive(Debug)]
pub struct MemoryHierarchyStore {
    folders: DashMap<FolderId, Folder>,
    documents: DashMap<DocumentId, Document>,
    next_id: AtomicI64,
    max_depth: usize,
}

impl MemoryHierarchyStore {
    /// Create an empty store that rejects chains longer than `max_depth`.
    pub fn new(max_depth: usize) -> Self {
        Self {
            folders: DashMap::new(),
            documents: DashMap::new(),
            next_id: AtomicI64::new(1),
            max_depth,
        }
    }

    /// Insert a folder row verbatim, bypassing parent checks.
    ///
    /// Meant for fixtures that need a specific shape, including broken ones.
    pub fn insert_folder(&self, folder: Folder) {
        self.folders.insert(folder.id, folder);
    }

    fn allocate_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn folder_in_scope(&self, folder_id: FolderId, scope: &TenantScope) -> Option<Folder> {
        self.folders
            .get(&folder_id)
            .map(|f| f.value().clone())
            .filter(|f| scope.permits(f.organization_id))
    }

    /// Whether `folder_id` exists and belongs to `organization_id`.
    pub(crate) fn owns_folder(&self, folder_id: FolderId, organization_id: OrganizationId) -> bool {
        self.folders
            .get(&folder_id)
            .is_some_and(|f| f.organization_id == organization_id)
    }

    /// Whether `document_id` exists and belongs to `organization_id`.
    pub(crate) fn owns_document(
        &self,
        document_id: DocumentId,
        organization_id: OrganizationId,
    ) -> bool {
        self.documents
            .get(&document_id)
            .is_some_and(|d| d.organization_id == organization_id)
    }
}

impl Default for MemoryHierarchyStore {
    fn default() -> Self {
        Self::new(64)
    }
}

#[async_trait]
impl HierarchyStore for MemoryHierarchyStore {
    async fn get_folder(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Option<Folder>> {
        Ok(self.folder_in_scope(folder_id, scope))
    }

    async fn get_ancestor_chain(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Vec<AncestorEntry>> {
        let Some(start) = self.folder_in_scope(folder_id, scope) else {
            return Ok(Vec::new());
        };

        let mut chain: Vec<AncestorEntry> = Vec::new();
        let mut seen = HashSet::from([folder_id]);
        let mut next = start.parent_id;

        while let Some(parent_id) = next {
            if !seen.insert(parent_id) {
                return Err(AppError::internal(format!(
                    "Folder {folder_id} has a cyclic ancestor chain at {parent_id}"
                )));
            }
            let Some(parent) = self.folder_in_scope(parent_id, scope) else {
                break;
            };
            if chain.len() == self.max_depth {
                return Err(AppError::internal(format!(
                    "Folder {folder_id} has more than {} ancestors",
                    self.max_depth
                )));
            }
            chain.push(AncestorEntry {
                id: parent.id,
                name: parent.name,
                depth: i32::try_from(chain.len() + 1).unwrap_or(i32::MAX),
            });
            next = parent.parent_id;
        }

        Ok(chain)
    }

    async fn get_document(
        &self,
        document_id: DocumentId,
        scope: &TenantScope,
    ) -> AppResult<Option<Document>> {
        Ok(self
            .documents
            .get(&document_id)
            .map(|d| d.value().clone())
            .filter(|d| scope.permits(d.organization_id)))
    }

    async fn create_folder(&self, data: CreateFolder) -> AppResult<Folder> {
        let organization_id = require_organization(&data)?;
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Folder name cannot be empty"));
        }
        if let Some(parent_id) = data.parent_id {
            if self
                .folder_in_scope(parent_id, &TenantScope::Organization(organization_id))
                .is_none()
            {
                return Err(AppError::resource_not_found());
            }
        }

        let now = Utc::now();
        let folder = Folder {
            id: FolderId::new(self.allocate_id()),
            organization_id,
            parent_id: data.parent_id,
            name: data.name,
            created_at: now,
            updated_at: now,
        };
        self.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn create_document(&self, data: CreateDocument) -> AppResult<Document> {
        let organization_id = require_organization(&data)?;
        if data.name.trim().is_empty() {
            return Err(AppError::validation("Document name cannot be empty"));
        }
        if self
            .folder_in_scope(data.folder_id, &TenantScope::Organization(organization_id))
            .is_none()
        {
            return Err(AppError::resource_not_found());
        }

        let now = Utc::now();
        let document = Document {
            id: DocumentId::new(self.allocate_id()),
            organization_id,
            folder_id: data.folder_id,
            name: data.name,
            created_at: now,
            updated_at: now,
        };
        self.documents.insert(document.id, document.clone());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;

    const ORG: OrganizationId = OrganizationId::new(5);
    const OTHER_ORG: OrganizationId = OrganizationId::new(7);

    async fn folder(store: &MemoryHierarchyStore, parent: Option<FolderId>, name: &str) -> Folder {
        store
            .create_folder(CreateFolder {
                organization_id: Some(ORG),
                parent_id: parent,
                name: name.into(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_ancestor_chain_is_nearest_first() {
        let store = MemoryHierarchyStore::default();
        let root = folder(&store, None, "root").await;
        let a = folder(&store, Some(root.id), "a").await;
        let b = folder(&store, Some(a.id), "b").await;
        let c = folder(&store, Some(b.id), "c").await;

        let chain = store
            .get_ancestor_chain(c.id, &TenantScope::Organization(ORG))
            .await
            .unwrap();
        let names: Vec<&str> = chain.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a", "root"]);
        assert_eq!(chain[0].depth, 1);
        assert_eq!(chain[2].depth, 3);
    }

    #[tokio::test]
    async fn test_other_tenant_sees_nothing() {
        let store = MemoryHierarchyStore::default();
        let root = folder(&store, None, "root").await;
        let child = folder(&store, Some(root.id), "child").await;
        let scope = TenantScope::Organization(OTHER_ORG);

        assert!(store.get_folder(child.id, &scope).await.unwrap().is_none());
        assert!(store.get_ancestor_chain(child.id, &scope).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_parent_must_share_organization() {
        let store = MemoryHierarchyStore::default();
        let root = folder(&store, None, "root").await;
        let err = store
            .create_folder(CreateFolder {
                organization_id: Some(OTHER_ORG),
                parent_id: Some(root.id),
                name: "intruder".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_cycle_is_reported() {
        let store = MemoryHierarchyStore::default();
        let now = Utc::now();
        for (id, parent) in [(1, 2), (2, 1)] {
            store.insert_folder(Folder {
                id: FolderId::new(id),
                organization_id: ORG,
                parent_id: Some(FolderId::new(parent)),
                name: format!("f{id}"),
                created_at: now,
                updated_at: now,
            });
        }
        let err = store
            .get_ancestor_chain(FolderId::new(1), &TenantScope::Organization(ORG))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Internal);
    }

    #[tokio::test]
    async fn test_depth_limit() {
        let store = MemoryHierarchyStore::new(2);
        let root = folder(&store, None, "root").await;
        let a = folder(&store, Some(root.id), "a").await;
        let b = folder(&store, Some(a.id), "b").await;
        let c = folder(&store, Some(b.id), "c").await;
        let scope = TenantScope::Organization(ORG);

        assert_eq!(store.get_ancestor_chain(b.id, &scope).await.unwrap().len(), 2);
        assert!(store.get_ancestor_chain(c.id, &scope).await.is_err());
    }

    #[tokio::test]
    async fn test_unstamped_write_is_refused() {
        let store = MemoryHierarchyStore::default();
        let err = store
            .create_folder(CreateFolder {
                organization_id: None,
                parent_id: None,
                name: "root".into(),
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::MissingTenant);
    }
}
