//! Request-owned tenant context.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::OrganizationId;

/// The organization a single request acts on behalf of.
///
/// Holds exactly one organization or nothing. The value belongs to the
/// request and is passed by reference to everything that needs it; it is
/// torn down when the request drops it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TenantContext {
    organization_id: Option<OrganizationId>,
}

impl TenantContext {
    /// An empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// A context already bound to `organization_id`.
    pub fn for_organization(organization_id: OrganizationId) -> AppResult<Self> {
        let mut ctx = Self::new();
        ctx.set(organization_id)?;
        Ok(ctx)
    }

    /// Bind the context to `organization_id`, replacing any previous value.
    pub fn set(&mut self, organization_id: OrganizationId) -> AppResult<()> {
        if !organization_id.is_valid() {
            return Err(AppError::invalid_context(format!(
                "Organization id must be positive, got {organization_id}"
            )));
        }
        self.organization_id = Some(organization_id);
        Ok(())
    }

    /// The bound organization.
    pub fn get(&self) -> AppResult<OrganizationId> {
        self.organization_id
            .ok_or_else(|| AppError::missing_tenant("No tenant bound to the current request"))
    }

    /// The bound organization, if any.
    pub fn get_or_none(&self) -> Option<OrganizationId> {
        self.organization_id
    }

    /// Unbind the context. Safe to call repeatedly.
    pub fn clear(&mut self) {
        self.organization_id = None;
    }

    /// Whether an organization is bound.
    pub fn has(&self) -> bool {
        self.organization_id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;

    #[test]
    fn test_set_and_get() {
        let mut ctx = TenantContext::new();
        assert!(!ctx.has());
        ctx.set(OrganizationId::new(5)).unwrap();
        assert_eq!(ctx.get().unwrap(), OrganizationId::new(5));
        ctx.set(OrganizationId::new(9)).unwrap();
        assert_eq!(ctx.get_or_none(), Some(OrganizationId::new(9)));
    }

    #[test]
    fn test_rejects_non_positive() {
        let mut ctx = TenantContext::new();
        for raw in [0, -3] {
            let err = ctx.set(OrganizationId::new(raw)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::InvalidContext);
        }
        assert!(!ctx.has());
        assert_eq!(
            TenantContext::for_organization(OrganizationId::new(0))
                .unwrap_err()
                .kind,
            ErrorKind::InvalidContext
        );
    }

    #[test]
    fn test_get_without_tenant() {
        let ctx = TenantContext::new();
        assert_eq!(ctx.get().unwrap_err().kind, ErrorKind::MissingTenant);
        assert_eq!(ctx.get_or_none(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut ctx = TenantContext::for_organization(OrganizationId::new(2)).unwrap();
        ctx.clear();
        ctx.clear();
        assert!(!ctx.has());
    }
}
