//! Document entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use docvault_core::traits::TenantScoped;
use docvault_core::types::{DocumentId, FolderId, OrganizationId};

/// A document stored inside a folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Document {
    /// Unique document identifier.
    pub id: DocumentId,
    /// The organization that owns this document.
    pub organization_id: OrganizationId,
    /// The containing folder.
    pub folder_id: FolderId,
    /// Document name.
    pub name: String,
    /// When the document was created.
    pub created_at: DateTime<Utc>,
    /// When the document was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data required to create a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateDocument {
    /// Owning organization (stamped by the tenant enforcer).
    #[serde(default)]
    pub organization_id: Option<OrganizationId>,
    /// The containing folder.
    pub folder_id: FolderId,
    /// Document name.
    pub name: String,
}

impl TenantScoped for CreateDocument {
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
