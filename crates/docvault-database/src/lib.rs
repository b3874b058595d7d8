//! # docvault-database
//!
//! Storage ports consumed by the access-control engine, plus their
//! PostgreSQL and in-memory implementations.
//!
//! Every read takes a [`TenantScope`]; every write takes a payload that
//! already carries its owning organization. Choosing the scope and stamping
//! the payload is the job of the tenant enforcer in `docvault-auth`, not of
//! the stores themselves.

pub mod connection;
pub mod memory;
pub mod repositories;
pub mod schema;
pub mod scope;
pub mod store;

use std::sync::Arc;

use docvault_core::config::{AppConfig, DatabaseProvider};
use docvault_core::result::AppResult;

pub use scope::TenantScope;
pub use store::{AclStore, HierarchyStore};

/// The pair of storage ports the rest of the system is built on.
#[derive(Debug, Clone)]
pub struct Stores {
    /// Folder / document hierarchy.
    pub hierarchy: Arc<dyn HierarchyStore>,
    /// Folder and document access-control entries.
    pub acl: Arc<dyn AclStore>,
}

impl Stores {
    /// A fresh pair of in-memory stores sharing one hierarchy.
    pub fn in_memory(max_depth: usize) -> Self {
        let hierarchy = Arc::new(memory::MemoryHierarchyStore::new(max_depth));
        Self {
            acl: Arc::new(memory::MemoryAclStore::new(Arc::clone(&hierarchy))),
            hierarchy,
        }
    }

    /// Build the stores selected by `config.database.provider`.
    pub async fn from_config(config: &AppConfig) -> AppResult<Self> {
        let max_depth = config.access.max_ancestor_depth;
        match config.database.provider {
            DatabaseProvider::Memory => Ok(Self::in_memory(max_depth)),
            DatabaseProvider::Postgres => {
                let pool = connection::connect(&config.database).await?;
                Ok(Self {
                    hierarchy: Arc::new(repositories::PgHierarchyStore::new(
                        pool.clone(),
                        max_depth,
                    )),
                    acl: Arc::new(repositories::AclRepository::new(pool)),
                })
            }
        }
    }
}
