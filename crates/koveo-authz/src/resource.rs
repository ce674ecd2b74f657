//! Resource references and actions accepted by the resolver.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthzError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Organization,
    Building,
    Residence,
}

/// A typed handle on one node of the tenancy hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ResourceRef {
    Organization(Uuid),
    Building(Uuid),
    Residence(Uuid),
}

impl ResourceRef {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceRef::Organization(_) => ResourceKind::Organization,
            ResourceRef::Building(_) => ResourceKind::Building,
            ResourceRef::Residence(_) => ResourceKind::Residence,
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            ResourceRef::Organization(id)
            | ResourceRef::Building(id)
            | ResourceRef::Residence(id) => id,
        }
    }

    /// Build a reference from an untrusted id string.
    pub fn parse(kind: ResourceKind, raw: &str) -> Result<Self, AuthzError> {
        let id = parse_id(raw)?;
        Ok(match kind {
            ResourceKind::Organization => ResourceRef::Organization(id),
            ResourceKind::Building => ResourceRef::Building(id),
            ResourceKind::Residence => ResourceRef::Residence(id),
        })
    }
}

impl fmt::Display for ResourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind() {
            ResourceKind::Organization => "organization",
            ResourceKind::Building => "building",
            ResourceKind::Residence => "residence",
        };
        write!(f, "{kind} {}", self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Read,
    Write,
}

/// Parse an untrusted id string. Surrounding whitespace is ignored.
pub fn parse_id(raw: &str) -> Result<Uuid, AuthzError> {
    let trimmed = raw.trim();
    Uuid::parse_str(trimmed).map_err(|_| {
        AuthzError::InvalidReference(format!("malformed id ({} chars)", trimmed.len()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_uuid_with_whitespace() {
        let id = Uuid::new_v4();
        let parsed = ResourceRef::parse(ResourceKind::Building, &format!(" {id} ")).unwrap();
        assert_eq!(parsed, ResourceRef::Building(id));
        assert_eq!(parsed.kind(), ResourceKind::Building);
    }

    #[test]
    fn parse_rejects_garbage() {
        for raw in ["", "123", "not-a-uuid", "'; DROP TABLE users; --"] {
            assert!(matches!(
                ResourceRef::parse(ResourceKind::Residence, raw),
                Err(AuthzError::InvalidReference(_))
            ));
        }
    }

    #[test]
    fn display_names_kind_and_id() {
        let id = Uuid::nil();
        assert_eq!(
            ResourceRef::Organization(id).to_string(),
            format!("organization {id}")
        );
    }
}
