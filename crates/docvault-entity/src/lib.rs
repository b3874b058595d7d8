//! # docvault-entity
//!
//! Domain entity models for DocVault. Every struct in this crate
//! represents a database table row, a write payload, or a domain value
//! object. Row entities additionally derive `sqlx::FromRow`.

pub mod document;
pub mod folder;
pub mod permission;
