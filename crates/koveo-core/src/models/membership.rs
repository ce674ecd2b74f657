//! Membership domain model.
//!
//! A membership ties a user to an organization, optionally narrowed to
//! one building or one residence inside it. The scope determines what
//! the record grants:
//!
//! - no building, no residence: organization-level membership
//!   (org-wide access for manager-class roles)
//! - `building_id` set: direct building association
//! - `residence_id` set: direct residence association; the record also
//!   names the residence's building, so it doubles as a building
//!   association for that building

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub id: Uuid,
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub building_id: Option<Uuid>,
    pub residence_id: Option<Uuid>,
    /// Role held within this membership. Clamped against the user's
    /// global role when access is resolved.
    pub role: Role,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Membership {
    /// True if the record is scoped to the whole organization.
    pub fn is_organization_wide(&self) -> bool {
        self.building_id.is_none() && self.residence_id.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMembership {
    pub user_id: Uuid,
    pub organization_id: Uuid,
    pub building_id: Option<Uuid>,
    pub residence_id: Option<Uuid>,
    pub role: Role,
}

impl CreateMembership {
    pub fn organization(user_id: Uuid, organization_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            organization_id,
            building_id: None,
            residence_id: None,
            role,
        }
    }

    pub fn building(user_id: Uuid, organization_id: Uuid, building_id: Uuid, role: Role) -> Self {
        Self {
            user_id,
            organization_id,
            building_id: Some(building_id),
            residence_id: None,
            role,
        }
    }

    pub fn residence(
        user_id: Uuid,
        organization_id: Uuid,
        building_id: Uuid,
        residence_id: Uuid,
        role: Role,
    ) -> Self {
        Self {
            user_id,
            organization_id,
            building_id: Some(building_id),
            residence_id: Some(residence_id),
            role,
        }
    }
}
