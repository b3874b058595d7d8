//! Authorization guard: turns a resolved permission into an allow/deny decision.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_core::types::{OrganizationId, UserId};
use docvault_entity::permission::{AccessLevel, EffectivePermission, ResourceRef};

use crate::tenant::TenantContext;

use super::comparator::at_least;
use super::resolver::PermissionResolver;

/// Why access was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    /// Nothing grants the user any access.
    NoGrant,
    /// A grant exists but is below the required level.
    InsufficientLevel {
        /// The level the user actually holds.
        held: AccessLevel,
    },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoGrant => write!(f, "no grant"),
            Self::InsufficientLevel { held } => write!(f, "insufficient level ({held})"),
        }
    }
}

/// Outcome of an authorization check. Callers must branch on it.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum Decision {
    /// Access granted on the strength of this permission.
    Allowed(EffectivePermission),
    /// Access refused.
    Denied(DenyReason),
}

impl Decision {
    /// Returns whether access was granted.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed(_))
    }

    /// Convert into a result, mapping every denial to the generic forbidden error.
    pub fn into_result(self) -> AppResult<EffectivePermission> {
        match self {
            Self::Allowed(permission) => Ok(permission),
            Self::Denied(_) => Err(AppError::forbidden()),
        }
    }
}

/// Checks a required access level against the resolved permission.
///
/// Holds no policy of its own. An optional deadline bounds each resolution;
/// when it expires the check fails with a timeout error rather than
/// producing a decision.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard {
    resolver: Arc<PermissionResolver>,
    timeout: Option<Duration>,
}

impl AuthorizationGuard {
    /// Creates a guard without a deadline.
    pub fn new(resolver: Arc<PermissionResolver>) -> Self {
        Self {
            resolver,
            timeout: None,
        }
    }

    /// Bound every resolution by `timeout`. `None` removes the bound.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// The underlying resolver.
    pub fn resolver(&self) -> &PermissionResolver {
        &self.resolver
    }

    /// Decide whether `user_id` holds at least `required` on `resource`.
    pub async fn authorize(
        &self,
        user_id: UserId,
        resource: ResourceRef,
        required: AccessLevel,
        organization_id: OrganizationId,
    ) -> AppResult<Decision> {
        let resolution = self.resolver.resolve(user_id, resource, organization_id);
        let resolved = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, resolution).await.map_err(|_| {
                AppError::timeout(format!(
                    "Permission resolution for {resource} exceeded {}ms",
                    limit.as_millis()
                ))
            })??,
            None => resolution.await?,
        };

        let decision = match resolved {
            Some(permission) if at_least(permission.access_level, required) => {
                Decision::Allowed(permission)
            }
            Some(permission) => Decision::Denied(DenyReason::InsufficientLevel {
                held: permission.access_level,
            }),
            None => Decision::Denied(DenyReason::NoGrant),
        };

        match &decision {
            Decision::Allowed(permission) => debug!(
                user_id = %user_id,
                resource = %resource,
                required = %required,
                resolved = %permission.describe(),
                "Access allowed"
            ),
            Decision::Denied(reason) => {
                let held = match reason {
                    DenyReason::InsufficientLevel { held } => held.as_str(),
                    DenyReason::NoGrant => "none",
                };
                warn!(
                    user_id = %user_id,
                    resource = %resource,
                    organization_id = %organization_id,
                    required = %required,
                    resolved = held,
                    "Access denied"
                );
            }
        }

        Ok(decision)
    }

    /// [`authorize`](Self::authorize) using the organization bound to `ctx`.
    pub async fn authorize_in(
        &self,
        ctx: &TenantContext,
        user_id: UserId,
        resource: ResourceRef,
        required: AccessLevel,
    ) -> AppResult<Decision> {
        let organization_id = ctx.get()?;
        self.authorize(user_id, resource, required, organization_id)
            .await
    }
}
