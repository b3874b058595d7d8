//! Permission resolution with folder inheritance, and the guard built on it.

pub mod comparator;
pub mod guard;
pub mod resolver;

pub use comparator::at_least;
pub use guard::{AuthorizationGuard, Decision, DenyReason};
pub use resolver::PermissionResolver;
