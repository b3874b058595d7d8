//! # docvault-service
//!
//! Business services for DocVault. Every operation takes a
//! [`RequestContext`], checks the caller through the authorization guard
//! before touching data, and writes through the tenant-enforcing stores.
//!
//! Services follow constructor injection: all dependencies are provided at
//! construction time via `Arc` references.

pub mod context;
pub mod permission;
pub mod resource;

use std::sync::Arc;

use docvault_auth::{AuthorizationGuard, PermissionResolver, ScopedAclStore, ScopedHierarchyStore};
use docvault_core::config::AccessConfig;
use docvault_database::Stores;

pub use context::RequestContext;
pub use permission::PermissionService;
pub use resource::ResourceService;

/// Every service, wired over one store pair.
#[derive(Debug, Clone)]
pub struct Services {
    /// Shared authorization guard.
    pub guard: Arc<AuthorizationGuard>,
    /// ACL management.
    pub permissions: PermissionService,
    /// Folder and document creation and reads.
    pub resources: ResourceService,
}

impl Services {
    /// Wire the services over `stores` using the resolution settings in `access`.
    pub fn new(stores: &Stores, access: &AccessConfig) -> Self {
        let resolver = Arc::new(PermissionResolver::from_stores(stores));
        let guard =
            Arc::new(AuthorizationGuard::new(resolver).with_timeout(access.resolve_timeout()));
        let hierarchy = ScopedHierarchyStore::new(Arc::clone(&stores.hierarchy));
        let acl = ScopedAclStore::new(Arc::clone(&stores.acl));

        Self {
            permissions: PermissionService::new(acl.clone(), Arc::clone(&guard)),
            resources: ResourceService::new(hierarchy, acl, Arc::clone(&guard)),
            guard,
        }
    }
}
