//! Access-control entry management.

pub mod service;

pub use service::PermissionService;
