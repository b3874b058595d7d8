//! Tenant predicate applied to store calls.

use docvault_core::types::OrganizationId;

/// The organization filter a store call runs under.
///
/// `Unrestricted` exists for explicitly justified administrative paths;
/// it is produced by the tenant enforcer's bypass mode and nowhere else in
/// request handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Only rows owned by this organization are visible.
    Organization(OrganizationId),
    /// No organization predicate.
    Unrestricted,
}

impl TenantScope {
    /// The organization the scope is restricted to, if any.
    pub fn organization(&self) -> Option<OrganizationId> {
        match self {
            Self::Organization(org) => Some(*org),
            Self::Unrestricted => None,
        }
    }

    /// Whether a row owned by `organization_id` is visible under this scope.
    pub fn permits(&self, organization_id: OrganizationId) -> bool {
        match self {
            Self::Organization(org) => *org == organization_id,
            Self::Unrestricted => true,
        }
    }

    /// Bind value for `($n::BIGINT IS NULL OR organization_id = $n)` predicates.
    pub(crate) fn sql_filter(&self) -> Option<i64> {
        self.organization().map(OrganizationId::get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permits() {
        let scope = TenantScope::Organization(OrganizationId::new(5));
        assert!(scope.permits(OrganizationId::new(5)));
        assert!(!scope.permits(OrganizationId::new(7)));
        assert!(TenantScope::Unrestricted.permits(OrganizationId::new(7)));
        assert_eq!(TenantScope::Unrestricted.sql_filter(), None);
        assert_eq!(scope.sql_filter(), Some(5));
    }
}
