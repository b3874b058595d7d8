//! Tenant stamping contract for persisted entities.

use crate::types::OrganizationId;

/// An entity that belongs to exactly one organization.
///
/// Write payloads implement this so that the tenant enforcer can overwrite
/// whatever organization a client put into the payload with the organization
/// bound to the request, before the value reaches storage.
pub trait TenantScoped: Sized {
    /// The organization currently carried by the value, if any.
    fn organization_id(&self) -> Option<OrganizationId>;

    /// Return the value re-owned by `organization_id`.
    fn with_organization(self, organization_id: OrganizationId) -> Self;
}
