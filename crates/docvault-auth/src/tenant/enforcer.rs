//! Tenant enforcement rules for store reads and writes.

use tracing::warn;

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::traits::TenantScoped;
use docvault_database::TenantScope;
use docvault_database::store::require_organization;

use super::context::TenantContext;

/// How a call site wants tenant enforcement applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeMode {
    /// Require a tenant in context.
    Scoped,
    /// Allow the call without a tenant. Carries the reason, which is logged
    /// every time the bypass is actually taken.
    Bypass(&'static str),
}

/// Applies the tenant rules to a single store call.
///
/// A bound tenant always wins: a bypass marker only matters when the
/// context is empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct TenantEnforcer;

impl TenantEnforcer {
    /// The scope a read must run under.
    pub fn read_scope(ctx: &TenantContext, mode: ScopeMode) -> AppResult<TenantScope> {
        if let Some(org) = ctx.get_or_none() {
            return Ok(TenantScope::Organization(org));
        }
        match mode {
            ScopeMode::Scoped => Err(AppError::missing_tenant(
                "Read attempted without a tenant context",
            )),
            ScopeMode::Bypass(justification) => {
                warn!(justification, "Unscoped read: tenant filter bypassed");
                Ok(TenantScope::Unrestricted)
            }
        }
    }

    /// Stamp a write payload with the context tenant.
    ///
    /// Any organization already on the payload is discarded in favor of the
    /// context value. Without a tenant, only a bypass write carrying its own
    /// valid organization gets through.
    pub fn stamp<E: TenantScoped>(ctx: &TenantContext, mode: ScopeMode, entity: E) -> AppResult<E> {
        if let Some(tenant) = ctx.get_or_none() {
            if let Some(supplied) = entity.organization_id() {
                if supplied != tenant {
                    warn!(
                        context_organization_id = %tenant,
                        supplied_organization_id = %supplied,
                        "Discarding client-supplied organization id"
                    );
                }
            }
            return Ok(entity.with_organization(tenant));
        }
        match mode {
            ScopeMode::Scoped => Err(AppError::missing_tenant(
                "Write attempted without a tenant context",
            )),
            ScopeMode::Bypass(justification) => {
                let org = require_organization(&entity)?;
                warn!(
                    justification,
                    organization_id = %org,
                    "Unscoped write: using payload organization"
                );
                Ok(entity)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docvault_core::error::ErrorKind;
    use docvault_core::types::{FolderId, OrganizationId, UserId};
    use docvault_entity::permission::{AccessLevel, FolderGrant};
    use tracing_test::traced_test;

    const BYPASS: ScopeMode = ScopeMode::Bypass("nightly consistency sweep");

    fn grant(org: Option<i64>) -> FolderGrant {
        FolderGrant {
            organization_id: org.map(OrganizationId::new),
            folder_id: FolderId::new(1),
            user_id: UserId::new(1),
            access_level: AccessLevel::Read,
            recursive: false,
        }
    }

    fn ctx(org: i64) -> TenantContext {
        TenantContext::for_organization(OrganizationId::new(org)).unwrap()
    }

    #[test]
    fn test_read_scope() {
        assert_eq!(
            TenantEnforcer::read_scope(&ctx(5), ScopeMode::Scoped).unwrap(),
            TenantScope::Organization(OrganizationId::new(5))
        );
        assert_eq!(
            TenantEnforcer::read_scope(&ctx(5), BYPASS).unwrap(),
            TenantScope::Organization(OrganizationId::new(5))
        );
        assert_eq!(
            TenantEnforcer::read_scope(&TenantContext::new(), BYPASS).unwrap(),
            TenantScope::Unrestricted
        );
        assert_eq!(
            TenantEnforcer::read_scope(&TenantContext::new(), ScopeMode::Scoped)
                .unwrap_err()
                .kind,
            ErrorKind::MissingTenant
        );
    }

    #[test]
    fn test_stamp_overwrites_payload_organization() {
        let stamped = TenantEnforcer::stamp(&ctx(5), ScopeMode::Scoped, grant(Some(7))).unwrap();
        assert_eq!(stamped.organization_id, Some(OrganizationId::new(5)));

        let stamped = TenantEnforcer::stamp(&ctx(5), ScopeMode::Scoped, grant(None)).unwrap();
        assert_eq!(stamped.organization_id, Some(OrganizationId::new(5)));
    }

    #[test]
    fn test_stamp_without_tenant() {
        let empty = TenantContext::new();
        assert_eq!(
            TenantEnforcer::stamp(&empty, ScopeMode::Scoped, grant(Some(7)))
                .unwrap_err()
                .kind,
            ErrorKind::MissingTenant
        );
        assert_eq!(
            TenantEnforcer::stamp(&empty, BYPASS, grant(None))
                .unwrap_err()
                .kind,
            ErrorKind::MissingTenant
        );
        let kept = TenantEnforcer::stamp(&empty, BYPASS, grant(Some(7))).unwrap();
        assert_eq!(kept.organization_id, Some(OrganizationId::new(7)));
    }

    #[test]
    #[traced_test]
    fn test_bypassed_read_warns_with_justification() {
        TenantEnforcer::read_scope(&TenantContext::new(), BYPASS).unwrap();
        logs_assert(|lines: &[&str]| {
            lines
                .iter()
                .find(|line| {
                    line.contains("WARN")
                        && line.contains("tenant filter bypassed")
                        && line.contains("nightly consistency sweep")
                })
                .map(|_| ())
                .ok_or_else(|| "expected a WARN carrying the justification".to_string())
        });
    }

    #[test]
    #[traced_test]
    fn test_bound_tenant_ignores_bypass_silently() {
        TenantEnforcer::read_scope(&ctx(5), BYPASS).unwrap();
        assert!(!logs_contain("bypassed"));
    }

    #[test]
    #[traced_test]
    fn test_overwritten_organization_is_logged() {
        TenantEnforcer::stamp(&ctx(5), ScopeMode::Scoped, grant(Some(7))).unwrap();
        logs_assert(|lines: &[&str]| {
            lines
                .iter()
                .find(|line| {
                    line.contains("WARN")
                        && line.contains("Discarding client-supplied organization id")
                        && line.contains("context_organization_id=5")
                        && line.contains("supplied_organization_id=7")
                })
                .map(|_| ())
                .ok_or_else(|| "expected a WARN naming both organizations".to_string())
        });
    }

    #[test]
    #[traced_test]
    fn test_matching_organization_is_not_logged() {
        TenantEnforcer::stamp(&ctx(5), ScopeMode::Scoped, grant(Some(5))).unwrap();
        assert!(!logs_contain("Discarding"));
    }

    #[test]
    #[traced_test]
    fn test_bypassed_write_warns_with_justification() {
        TenantEnforcer::stamp(&TenantContext::new(), BYPASS, grant(Some(7))).unwrap();
        assert!(logs_contain("Unscoped write"));
        assert!(logs_contain("nightly consistency sweep"));
    }
}
