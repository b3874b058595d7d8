//! Tenant context and enforcement over the storage ports.

pub mod context;
pub mod enforcer;
pub mod scoped;

pub use context::TenantContext;
pub use enforcer::{ScopeMode, TenantEnforcer};
pub use scoped::{ScopedAclStore, ScopedHierarchyStore};
