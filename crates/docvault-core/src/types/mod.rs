//! Shared value types.

pub mod id;

pub use id::{AceId, DocumentId, FolderId, OrganizationId, UserId};
