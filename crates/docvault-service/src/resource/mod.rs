//! Folder and document operations.

pub mod service;

pub use service::{CreateDocumentRequest, CreateFolderRequest, ResourceService};
