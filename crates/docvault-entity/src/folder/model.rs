//! Folder entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::traits::TenantScoped;
use docvault_core::types::{FolderId, OrganizationId};

/// A folder in the document hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Folder {
    /// Unique folder identifier.
    pub id: FolderId,
    /// The organization that owns this folder.
    pub organization_id: OrganizationId,
    /// Parent folder ID (null for root folders).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
    /// When the folder was created.
    pub created_at: DateTime<Utc>,
    /// When the folder was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One step of a folder's ancestor chain.
///
/// Depth counts from the queried folder: the direct parent is depth 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AncestorEntry {
    /// Ancestor folder ID.
    pub id: FolderId,
    /// Ancestor folder name.
    pub name: String,
    /// Distance from the queried folder.
    pub depth: i32,
}

/// Data required to create a new folder.
///
/// `organization_id` may arrive from a client payload; it is always
/// overwritten with the request tenant before the folder is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFolder {
    /// Owning organization (stamped by the tenant enforcer).
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// Parent folder (None for root).
    pub parent_id: Option<FolderId>,
    /// Folder name.
    pub name: String,
}

impl TenantScoped for CreateFolder {
    fn organization_id(&self) -> Option<OrganizationId> {
        self.organization_id
    }

    fn with_organization(self, organization_id: OrganizationId) -> Self {
        Self {
            organization_id: Some(organization_id),
            ..self
        }
    }
}
