//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local repositories with the same semantics
//! - **notify**: the broadcast bus behind the change feed
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod memory;
pub mod notify;
pub mod persistence;
