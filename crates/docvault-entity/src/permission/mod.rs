//! Access-control domain entities.

pub mod effective;
pub mod level;
pub mod model;

pub use effective::EffectivePermission;
pub use level::AccessLevel;
pub use model::{DocumentAce, DocumentGrant, FolderAce, FolderGrant, ResourceKind, ResourceRef};
