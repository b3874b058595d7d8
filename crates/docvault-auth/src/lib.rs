//! # docvault-auth
//!
//! Access decisions and tenant isolation for DocVault.
//!
//! ## Modules
//!
//! - `tenant` — request tenant context, the enforcer that scopes reads and
//!   stamps writes, and store decorators that apply it
//! - `acl` — access-level comparison, nearest-ancestor permission
//!   resolution, and the authorization guard

pub mod acl;
pub mod tenant;

pub use acl::{AuthorizationGuard, Decision, DenyReason, PermissionResolver, at_least};
pub use tenant::{ScopeMode, ScopedAclStore, ScopedHierarchyStore, TenantContext, TenantEnforcer};
