//! PostgreSQL-backed [`HierarchyStore`].

use async_trait::async_trait;
use sqlx::PgPool;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{DocumentId, FolderId};
use docvault_entity::document::{CreateDocument, Document};
use docvault_entity::folder::{AncestorEntry, CreateFolder, Folder};

use crate::scope::TenantScope;
use crate::store::HierarchyStore;

use super::document::DocumentRepository;
use super::folder::FolderRepository;

/// Hierarchy store composed from the folder and document repositories.
#[derive(Debug, Clone)]
pub struct PgHierarchyStore {
    folders: FolderRepository,
    documents: DocumentRepository,
    max_depth: usize,
}

impl PgHierarchyStore {
    /// Create a store over `pool` that rejects chains longer than `max_depth`.
    pub fn new(pool: PgPool, max_depth: usize) -> Self {
        Self {
            folders: FolderRepository::new(pool.clone()),
            documents: DocumentRepository::new(pool),
            max_depth,
        }
    }
}

#[async_trait]
impl HierarchyStore for PgHierarchyStore {
    async fn get_folder(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Option<Folder>> {
        self.folders.find_by_id(folder_id, scope).await
    }

    async fn get_ancestor_chain(
        &self,
        folder_id: FolderId,
        scope: &TenantScope,
    ) -> AppResult<Vec<AncestorEntry>> {
        let chain = self
            .folders
            .find_ancestors(folder_id, scope, self.max_depth)
            .await?;
        if chain.len() > self.max_depth {
            return Err(AppError::internal(format!(
                "Folder {folder_id} has more than {} ancestors; hierarchy is too deep or cyclic",
                self.max_depth
            )));
        }
        Ok(chain)
    }

    async fn get_document(
        &self,
        document_id: DocumentId,
        scope: &TenantScope,
    ) -> AppResult<Option<Document>> {
        self.documents.find_by_id(document_id, scope).await
    }

    async fn create_folder(&self, data: CreateFolder) -> AppResult<Folder> {
        self.folders.create(&data).await
    }

    async fn create_document(&self, data: CreateDocument) -> AppResult<Document> {
        self.documents.create(&data).await
    }
}
