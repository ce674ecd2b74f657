//! Koveo Database: in-memory store and repository implementations.
//!
//! This crate provides:
//! - A shared in-process store ([`MemoryStore`])
//! - Repository implementations for the `koveo-core` traits
//! - Error types ([`StoreError`])
//!
//! The store enforces the tenancy invariants on write: a building
//! needs an existing organization, a residence needs an existing
//! building, and a membership's scope must be consistent with the
//! hierarchy.

mod error;
pub mod repository;
mod store;

pub use error::StoreError;
pub use store::MemoryStore;
