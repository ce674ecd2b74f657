//! Domain models for Koveo.
//!
//! These are the core types shared across all crates. The tenancy
//! hierarchy is Organization → Building → Residence; users reach it
//! through [`membership::Membership`] records.

pub mod building;
pub mod membership;
pub mod organization;
pub mod residence;
pub mod role;
pub mod user;
