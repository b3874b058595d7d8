//! In-memory store implementations backed by `dashmap`.
//!
//! Used for the `memory` database provider and throughout the test suites.
//! Semantics match the PostgreSQL repositories: scope filtering, the
//! per-pair uniqueness of access entries, and same-organization parents.

pub mod acl;
pub mod hierarchy;

pub use acl::MemoryAclStore;
pub use hierarchy::MemoryHierarchyStore;
