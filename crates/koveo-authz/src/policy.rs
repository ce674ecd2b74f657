//! Pure access rules over a user's role and membership snapshot.
//!
//! Nothing here performs I/O; the resolver loads the records and asks
//! these functions for a decision.

use koveo_core::models::building::Building;
use koveo_core::models::membership::Membership;
use koveo_core::models::residence::Residence;
use koveo_core::models::role::Role;
use uuid::Uuid;

/// An active user together with their active memberships.
#[derive(Debug, Clone)]
pub(crate) struct Subject {
    pub(crate) role: Role,
    pub(crate) memberships: Vec<Membership>,
}

impl Subject {
    pub(crate) fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Role in effect for one membership: the less privileged of the
    /// user's role and the role recorded on the membership.
    fn effective_role(&self, membership: &Membership) -> Role {
        self.role.least_privileged(membership.role)
    }

    /// Organizations in which this subject manages every building.
    pub(crate) fn managed_organizations(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.memberships
            .iter()
            .filter(|m| m.is_organization_wide() && self.effective_role(m).is_manager_class())
            .map(|m| m.organization_id)
    }

    /// Buildings this subject manages through a building-scoped
    /// membership.
    pub(crate) fn managed_buildings(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.memberships
            .iter()
            .filter(|m| m.residence_id.is_none() && self.effective_role(m).is_manager_class())
            .filter_map(|m| m.building_id)
    }

    /// Organizations with any membership record, in first-seen order.
    pub(crate) fn organization_ids(&self) -> Vec<Uuid> {
        let mut ids = Vec::new();
        for m in &self.memberships {
            if !ids.contains(&m.organization_id) {
                ids.push(m.organization_id);
            }
        }
        ids
    }

    /// Buildings named by any membership record.
    pub(crate) fn associated_buildings(&self) -> impl Iterator<Item = (Uuid, Uuid)> + '_ {
        self.memberships
            .iter()
            .filter_map(|m| m.building_id.map(|b| (m.organization_id, b)))
    }

    /// Residences named by any membership record.
    pub(crate) fn associated_residences(&self) -> impl Iterator<Item = Uuid> + '_ {
        self.memberships.iter().filter_map(|m| m.residence_id)
    }
}

pub(crate) fn grants_organization(subject: &Subject, organization_id: Uuid) -> bool {
    subject.is_admin()
        || subject
            .memberships
            .iter()
            .any(|m| m.organization_id == organization_id)
}

/// Admin bypass, org-wide management of the owning organization, or a
/// direct association with this building.
pub(crate) fn grants_building(subject: &Subject, building: &Building) -> bool {
    if subject.is_admin() {
        return true;
    }
    if subject
        .managed_organizations()
        .any(|org| org == building.organization_id)
    {
        return true;
    }
    subject
        .associated_buildings()
        .any(|(org, b)| org == building.organization_id && b == building.id)
}

/// Managers reach a residence through building access. Tenants and
/// residents need a membership naming the residence itself.
pub(crate) fn grants_residence(
    subject: &Subject,
    residence: &Residence,
    building: &Building,
) -> bool {
    if subject.is_admin() {
        return true;
    }
    if residence.building_id != building.id {
        return false;
    }
    if subject
        .managed_organizations()
        .any(|org| org == building.organization_id)
    {
        return true;
    }
    let manages_building = subject.memberships.iter().any(|m| {
        m.residence_id.is_none()
            && m.organization_id == building.organization_id
            && m.building_id == Some(building.id)
            && subject.effective_role(m).is_manager_class()
    });
    if manages_building {
        return true;
    }
    subject.memberships.iter().any(|m| {
        m.residence_id == Some(residence.id)
            && m.building_id == Some(building.id)
            && m.organization_id == building.organization_id
    })
}
