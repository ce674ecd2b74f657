//! Role domain model.
//!
//! Roles form a closed set with an explicit precedence order:
//! admin > manager > tenant / resident. Demo variants carry the
//! precedence of their base role.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::KoveoError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Tenant,
    Resident,
    DemoManager,
    DemoTenant,
    DemoResident,
}

impl Role {
    pub const ALL: [Role; 7] = [
        Role::Admin,
        Role::Manager,
        Role::Tenant,
        Role::Resident,
        Role::DemoManager,
        Role::DemoTenant,
        Role::DemoResident,
    ];

    /// The non-demo role this role behaves as.
    pub fn base(self) -> Role {
        match self {
            Role::DemoManager => Role::Manager,
            Role::DemoTenant => Role::Tenant,
            Role::DemoResident => Role::Resident,
            other => other,
        }
    }

    pub fn is_demo(self) -> bool {
        matches!(self, Role::DemoManager | Role::DemoTenant | Role::DemoResident)
    }

    /// Precedence rank; higher is more privileged. Tenant and resident
    /// share a rank.
    pub fn rank(self) -> u8 {
        match self.base() {
            Role::Admin => 3,
            Role::Manager => 2,
            _ => 1,
        }
    }

    pub fn is_admin(self) -> bool {
        self == Role::Admin
    }

    /// Manager-class roles get organization-wide access through a
    /// membership.
    pub fn is_manager_class(self) -> bool {
        self.base() == Role::Manager
    }

    /// The less privileged of two roles. Ties keep `self`.
    pub fn least_privileged(self, other: Role) -> Role {
        if other.rank() < self.rank() { other } else { self }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Tenant => "tenant",
            Role::Resident => "resident",
            Role::DemoManager => "demo_manager",
            Role::DemoTenant => "demo_tenant",
            Role::DemoResident => "demo_resident",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = KoveoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| KoveoError::InvalidArgument(format!("unknown role: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precedence_order() {
        assert!(Role::Admin.rank() > Role::Manager.rank());
        assert!(Role::Manager.rank() > Role::Tenant.rank());
        assert_eq!(Role::Tenant.rank(), Role::Resident.rank());
        assert_eq!(Role::DemoManager.rank(), Role::Manager.rank());
    }

    #[test]
    fn least_privileged_picks_lower_rank() {
        assert_eq!(Role::Admin.least_privileged(Role::Tenant), Role::Tenant);
        assert_eq!(Role::Manager.least_privileged(Role::Admin), Role::Manager);
        assert_eq!(
            Role::DemoManager.least_privileged(Role::Manager),
            Role::DemoManager
        );
    }

    #[test]
    fn parse_and_display_agree() {
        for role in Role::ALL {
            assert_eq!(role.to_string().parse::<Role>().unwrap(), role);
        }
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&Role::DemoResident).unwrap();
        assert_eq!(json, "\"demo_resident\"");
    }
}
