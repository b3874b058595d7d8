//! PostgreSQL repository implementations of the storage ports.

pub mod document;
pub mod folder;
pub mod hierarchy;
pub mod permission;

pub use document::DocumentRepository;
pub use folder::FolderRepository;
pub use hierarchy::PgHierarchyStore;
pub use permission::AclRepository;

use docvault_core::error::{AppError, ErrorKind};

/// Map a write failure, translating cross-tenant foreign-key misses into the
/// uniform not-found error.
pub(crate) fn map_write_error(e: sqlx::Error, context: &'static str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::resource_not_found()
        }
        _ => AppError::with_source(ErrorKind::Database, context, e),
    }
}
