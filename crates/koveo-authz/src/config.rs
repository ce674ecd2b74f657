//! Authorization configuration.

/// Configuration for the access resolver.
#[derive(Debug, Clone)]
pub struct AuthzConfig {
    /// Deny every [`Action::Write`](crate::Action::Write) to demo roles
    /// (default: true).
    pub demo_roles_read_only: bool,
}

impl Default for AuthzConfig {
    fn default() -> Self {
        Self {
            demo_roles_read_only: true,
        }
    }
}
