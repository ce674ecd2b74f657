//! Koveo Authz: role-based access control over the tenancy hierarchy
//! (organization → building → residence).
//!
//! Every check is default-deny: unknown ids, inactive users, and
//! lookup failures all resolve to `false` (or an empty list), never to
//! an error or a grant.

pub mod config;
pub mod error;
mod policy;
pub mod resolver;
pub mod resource;

pub use config::AuthzConfig;
pub use error::AuthzError;
pub use resolver::AccessResolver;
pub use resource::{Action, ResourceKind, ResourceRef};
