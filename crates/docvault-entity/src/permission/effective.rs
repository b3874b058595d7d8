//! Resolved permission with provenance.

use serde::{Deserialize, Serialize};

use super::level::AccessLevel;
use super::model::ResourceRef;

/// The outcome of a successful permission resolution.
///
/// `label_path` lists folder names from the granting folder down to the
/// queried folder (or the containing folder, for documents). It is only
/// populated for inherited grants and is meant for logs and explanations,
/// never for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectivePermission {
    /// Resolved level.
    pub access_level: AccessLevel,
    /// The resource whose entry produced this decision.
    pub origin: ResourceRef,
    /// Whether the grant came from somewhere other than the queried resource.
    pub inherited: bool,
    /// Folder names from the origin down to the queried resource.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub label_path: Vec<String>,
}

impl EffectivePermission {
    /// A grant held directly on the queried resource.
    pub fn direct(access_level: AccessLevel, origin: ResourceRef) -> Self {
        Self {
            access_level,
            origin,
            inherited: false,
            label_path: Vec::new(),
        }
    }

    /// A grant inherited from `origin`.
    pub fn inherited(
        access_level: AccessLevel,
        origin: ResourceRef,
        label_path: Vec<String>,
    ) -> Self {
        Self {
            access_level,
            origin,
            inherited: true,
            label_path,
        }
    }

    /// Human-readable provenance, e.g. `WRITE via folder:12 (Projects / Q3)`.
    pub fn describe(&self) -> String {
        if self.inherited {
            format!(
                "{} via {} ({})",
                self.access_level,
                self.origin,
                self.label_path.join(" / ")
            )
        } else {
            format!("{} direct on {}", self.access_level, self.origin)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::types::{DocumentId, FolderId};

    #[test]
    fn test_describe() {
        let direct = EffectivePermission::direct(
            AccessLevel::Admin,
            ResourceRef::Document(DocumentId::new(3)),
        );
        assert_eq!(direct.describe(), "ADMIN direct on document:3");

        let inherited = EffectivePermission::inherited(
            AccessLevel::Write,
            ResourceRef::Folder(FolderId::new(12)),
            vec!["Projects".into(), "Q3".into()],
        );
        assert_eq!(inherited.describe(), "WRITE via folder:12 (Projects / Q3)");
    }
}
