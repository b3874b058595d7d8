//! Access-control entry models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::traits::TenantScoped;
use docvault_core::types::{AceId, DocumentId, FolderId, OrganizationId, UserId};

use super::level::AccessLevel;

/// Kind of resource an access decision is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A folder resource.
    Folder,
    /// A document resource.
    Document,
}

impl ResourceKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "folder",
            Self::Document => "document",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A typed reference to a folder or a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum ResourceRef {
    /// A folder.
    Folder(FolderId),
    /// A document.
    Document(DocumentId),
}

impl ResourceRef {
    /// Build a reference from a kind and a raw id.
    pub fn new(kind: ResourceKind, id: i64) -> Self {
        match kind {
            ResourceKind::Folder => Self::Folder(FolderId::new(id)),
            ResourceKind::Document => Self::Document(DocumentId::new(id)),
        }
    }

    /// The kind of the referenced resource.
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::Folder(_) => ResourceKind::Folder,
            Self::Document(_) => ResourceKind::Document,
        }
    }

    /// The raw identifier of the referenced resource.
    pub fn id(&self) -> i64 {
        match self {
            Self::Folder(id) => id.get(),
            Self::Document(id) => id.get(),
        }
    }
}

impl std::fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// A stored folder grant. Unique per `(folder_id, user_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct FolderAce {
    /// Row identifier.
    pub id: AceId,
    /// Folder the grant applies to.
    pub folder_id: FolderId,
    /// Grantee.
    pub user_id: UserId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Granted level.
    pub access_level: AccessLevel,
    /// Whether the grant propagates to descendant folders and documents.
    pub recursive: bool,
    /// When this entry was created.
    pub created_at: DateTime<Utc>,
    /// When this entry was last changed.
    pub updated_at: DateTime<Utc>,
}

/// A stored document grant. Unique per `(document_id, user_id)`; never propagates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct DocumentAce {
    /// Row identifier.
    pub id: AceId,
    /// Document the grant applies to.
    pub document_id: DocumentId,
    /// Grantee.
    pub user_id: UserId,
    /// Owning organization.
    pub organization_id: OrganizationId,
    /// Granted level.
    pub access_level: AccessLevel,
    /// When this entry was created.
    pub created_at: DateTime<Utc>,
    /// When this entry was last changed.
    pub updated_at: DateTime<Utc>,
}

/// Write payload for creating or replacing a folder grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderGrant {
    /// Owning organization (stamped by the tenant enforcer).
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// Target folder.
    pub folder_id: FolderId,
    /// Grantee.
    pub user_id: UserId,
    /// Granted level.
    pub access_level: AccessLevel,
    /// Whether the grant propagates to descendants.
    #[serde(default)]
    pub recursive: bool,
}

impl TenantScoped for FolderGrant {
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

/// Write payload for creating or replacing a document grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentGrant {
    /// Owning organization (stamped by the tenant enforcer).
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// Target document.
    pub document_id: DocumentId,
    /// Grantee.
    pub user_id: UserId,
    /// Granted level.
    pub access_level: AccessLevel,
}

impl TenantScoped for DocumentGrant {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_ref_accessors() {
        let r = ResourceRef::new(ResourceKind::Document, 9);
        assert_eq!(r, ResourceRef::Document(DocumentId::new(9)));
        assert_eq!(r.kind(), ResourceKind::Document);
        assert_eq!(r.id(), 9);
        assert_eq!(r.to_string(), "document:9");
    }

    #[test]
    fn test_stamping_replaces_client_organization() {
        let grant = FolderGrant {
            organization_id: Some(OrganizationId::new(7)),
            folder_id: FolderId::new(1),
            user_id: UserId::new(2),
            access_level: AccessLevel::Read,
            recursive: true,
        };
        let stamped = grant.with_organization(OrganizationId::new(5));
        assert_eq!(stamped.organization_id, Some(OrganizationId::new(5)));
        assert!(stamped.recursive);
    }
}
