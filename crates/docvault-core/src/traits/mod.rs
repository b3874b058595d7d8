//! Core traits defined in `docvault-core` and implemented by other crates.

pub mod tenant;

pub use tenant::TenantScoped;
