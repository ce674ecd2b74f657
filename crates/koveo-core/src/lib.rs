//! Koveo Core: domain models, error taxonomy, and repository traits
//! shared by the access-control and validation crates.

pub mod error;
pub mod models;
pub mod repository;
