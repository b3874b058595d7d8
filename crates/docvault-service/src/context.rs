//! Request context carrying the asserted identity and its tenant.

use chrono::{DateTime, Utc};

use docvault_auth::{AuthorizationGuard, TenantContext};
use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{OrganizationId, UserId};
use docvault_entity::permission::{AccessLevel, EffectivePermission, ResourceRef};

/// Context for the current request.
///
/// Built from the `(user, organization)` pair asserted by the upstream
/// identity layer and passed into every service method. Dropping it tears
/// the tenant down.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// The acting user.
    pub user_id: UserId,
    /// The tenant the request is bound to.
    pub tenant: TenantContext,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a context from a trusted identity assertion.
    pub fn from_identity(user_id: UserId, organization_id: OrganizationId) -> AppResult<Self> {
        if !user_id.is_valid() {
            return Err(AppError::invalid_context(format!(
                "User id must be positive, got {user_id}"
            )));
        }
        Ok(Self {
            user_id,
            tenant: TenantContext::for_organization(organization_id)?,
            request_time: Utc::now(),
        })
    }

    /// The organization the request is bound to.
    pub fn organization_id(&self) -> AppResult<OrganizationId> {
        self.tenant.get()
    }
}

/// Require `required` on `resource` for the acting user.
///
/// Denials and not-found resources come back as the same generic forbidden
/// error; timeouts and infrastructure failures pass through.
pub(crate) async fn require_access(
    guard: &AuthorizationGuard,
    ctx: &RequestContext,
    resource: ResourceRef,
    required: AccessLevel,
) -> AppResult<EffectivePermission> {
    guard
        .authorize_in(&ctx.tenant, ctx.user_id, resource, required)
        .await
        .and_then(|decision| decision.into_result())
        .map_err(AppError::into_public)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;

    #[test]
    fn test_from_identity_validates_ids() {
        let ctx = RequestContext::from_identity(UserId::new(1), OrganizationId::new(2)).unwrap();
        assert_eq!(ctx.organization_id().unwrap(), OrganizationId::new(2));

        let err =
            RequestContext::from_identity(UserId::new(0), OrganizationId::new(2)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidContext);
        let err =
            RequestContext::from_identity(UserId::new(1), OrganizationId::new(-4)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidContext);
    }
}
