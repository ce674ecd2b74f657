//! Access control resolver.
//!
//! Walks Residence → Building → Organization and the user's membership
//! records to decide whether a user may act on a resource. The resolver
//! only reads from its repositories and holds no state between calls,
//! so identical calls over unchanged data return identical results.

use koveo_core::error::{KoveoError, KoveoResult};
use koveo_core::repository::{
    BuildingRepository, MembershipRepository, OrganizationRepository, ResidenceRepository,
    UserRepository,
};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::AuthzConfig;
use crate::error::AuthzError;
use crate::policy::{self, Subject};
use crate::resource::{Action, ResourceKind, ResourceRef};

/// Access control resolver.
///
/// Generic over repository implementations so that the authorization
/// layer has no dependency on the storage crate.
pub struct AccessResolver<U, O, B, R, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    B: BuildingRepository,
    R: ResidenceRepository,
    M: MembershipRepository,
{
    users: U,
    organizations: O,
    buildings: B,
    residences: R,
    memberships: M,
    config: AuthzConfig,
}

/// Collapse a lookup result into a decision. Missing records are an
/// ordinary denial; anything else is logged as a lookup failure.
fn deny_on_error<T: Default>(operation: &str, user_id: Uuid, result: KoveoResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(KoveoError::NotFound { entity, id }) => {
            debug!(%user_id, operation, %entity, %id, "reference not found, denying");
            T::default()
        }
        Err(e) => {
            warn!(%user_id, operation, error = %e, "access lookup failed, denying");
            T::default()
        }
    }
}

impl<U, O, B, R, M> AccessResolver<U, O, B, R, M>
where
    U: UserRepository,
    O: OrganizationRepository,
    B: BuildingRepository,
    R: ResidenceRepository,
    M: MembershipRepository,
{
    pub fn new(
        users: U,
        organizations: O,
        buildings: B,
        residences: R,
        memberships: M,
        config: AuthzConfig,
    ) -> Self {
        Self {
            users,
            organizations,
            buildings,
            residences,
            memberships,
            config,
        }
    }

    /// Load the user and their memberships. Inactive users resolve to
    /// `None`. Admins skip the membership lookup.
    async fn subject(&self, user_id: Uuid) -> KoveoResult<Option<Subject>> {
        let user = self.users.get_by_id(user_id).await?;
        if !user.is_active() {
            debug!(%user_id, "inactive user, denying");
            return Ok(None);
        }
        let memberships = if user.role.is_admin() {
            Vec::new()
        } else {
            self.memberships.list_for_user(user_id).await?
        };
        Ok(Some(Subject {
            role: user.role,
            memberships,
        }))
    }

    // -----------------------------------------------------------------
    // Organizations
    // -----------------------------------------------------------------

    async fn try_accessible_organizations(&self, user_id: Uuid) -> KoveoResult<Vec<Uuid>> {
        let Some(subject) = self.subject(user_id).await? else {
            return Ok(Vec::new());
        };
        if subject.is_admin() {
            let orgs = self.organizations.list().await?;
            return Ok(orgs.into_iter().map(|o| o.id).collect());
        }
        Ok(subject.organization_ids())
    }

    /// Every organization the user may access. Admins get all of them;
    /// everyone else gets the organizations they hold a membership in.
    pub async fn get_user_accessible_organizations(&self, user_id: Uuid) -> Vec<Uuid> {
        deny_on_error(
            "accessible_organizations",
            user_id,
            self.try_accessible_organizations(user_id).await,
        )
    }

    async fn try_organization(&self, user_id: Uuid, organization_id: Uuid) -> KoveoResult<bool> {
        let Some(subject) = self.subject(user_id).await? else {
            return Ok(false);
        };
        if subject.is_admin() {
            // Admin access still requires the organization to exist.
            self.organizations.get_by_id(organization_id).await?;
            return Ok(true);
        }
        Ok(policy::grants_organization(&subject, organization_id))
    }

    pub async fn can_user_access_organization(&self, user_id: Uuid, organization_id: Uuid) -> bool {
        deny_on_error(
            "organization",
            user_id,
            self.try_organization(user_id, organization_id).await,
        )
    }

    // -----------------------------------------------------------------
    // Buildings
    // -----------------------------------------------------------------

    async fn try_building(&self, user_id: Uuid, building_id: Uuid) -> KoveoResult<bool> {
        let building = self.buildings.get_by_id(building_id).await?;
        let Some(subject) = self.subject(user_id).await? else {
            return Ok(false);
        };
        Ok(policy::grants_building(&subject, &building))
    }

    pub async fn can_user_access_building(&self, user_id: Uuid, building_id: Uuid) -> bool {
        deny_on_error(
            "building",
            user_id,
            self.try_building(user_id, building_id).await,
        )
    }

    async fn try_accessible_buildings(&self, user_id: Uuid) -> KoveoResult<Vec<Uuid>> {
        let Some(subject) = self.subject(user_id).await? else {
            return Ok(Vec::new());
        };

        let org_wide: Vec<Uuid> = if subject.is_admin() {
            self.organizations
                .list()
                .await?
                .into_iter()
                .map(|o| o.id)
                .collect()
        } else {
            subject.managed_organizations().collect()
        };

        let mut ids = Vec::new();
        for org in org_wide {
            for building in self.buildings.list_by_organization(org).await? {
                push_unique(&mut ids, building.id);
            }
        }
        for (_, building_id) in subject.associated_buildings() {
            // The association only counts if it agrees with the hierarchy.
            let building = self.buildings.get_by_id(building_id).await?;
            if policy::grants_building(&subject, &building) {
                push_unique(&mut ids, building.id);
            }
        }
        Ok(ids)
    }

    /// Every building the user may access, following the same rules as
    /// [`Self::can_user_access_building`].
    pub async fn get_user_accessible_buildings(&self, user_id: Uuid) -> Vec<Uuid> {
        deny_on_error(
            "accessible_buildings",
            user_id,
            self.try_accessible_buildings(user_id).await,
        )
    }

    // -----------------------------------------------------------------
    // Residences
    // -----------------------------------------------------------------

    async fn try_residence(&self, user_id: Uuid, residence_id: Uuid) -> KoveoResult<bool> {
        let residence = self.residences.get_by_id(residence_id).await?;
        let building = self.buildings.get_by_id(residence.building_id).await?;
        let Some(subject) = self.subject(user_id).await? else {
            return Ok(false);
        };
        Ok(policy::grants_residence(&subject, &residence, &building))
    }

    pub async fn can_user_access_residence(&self, user_id: Uuid, residence_id: Uuid) -> bool {
        deny_on_error(
            "residence",
            user_id,
            self.try_residence(user_id, residence_id).await,
        )
    }

    async fn try_accessible_residences(&self, user_id: Uuid) -> KoveoResult<Vec<Uuid>> {
        let Some(subject) = self.subject(user_id).await? else {
            return Ok(Vec::new());
        };

        let mut managed_buildings = Vec::new();
        if subject.is_admin() {
            for org in self.organizations.list().await? {
                for building in self.buildings.list_by_organization(org.id).await? {
                    push_unique(&mut managed_buildings, building.id);
                }
            }
        } else {
            for org in subject.managed_organizations().collect::<Vec<_>>() {
                for building in self.buildings.list_by_organization(org).await? {
                    push_unique(&mut managed_buildings, building.id);
                }
            }
            for building_id in subject.managed_buildings().collect::<Vec<_>>() {
                let building = self.buildings.get_by_id(building_id).await?;
                if policy::grants_building(&subject, &building) {
                    push_unique(&mut managed_buildings, building.id);
                }
            }
        }

        let mut ids = Vec::new();
        for building_id in &managed_buildings {
            for residence in self.residences.list_by_building(*building_id).await? {
                push_unique(&mut ids, residence.id);
            }
        }
        for residence_id in subject.associated_residences().collect::<Vec<_>>() {
            let residence = self.residences.get_by_id(residence_id).await?;
            let building = self.buildings.get_by_id(residence.building_id).await?;
            if policy::grants_residence(&subject, &residence, &building) {
                push_unique(&mut ids, residence.id);
            }
        }
        Ok(ids)
    }

    /// Every residence the user may access, following the same rules as
    /// [`Self::can_user_access_residence`].
    pub async fn get_user_accessible_residences(&self, user_id: Uuid) -> Vec<Uuid> {
        deny_on_error(
            "accessible_residences",
            user_id,
            self.try_accessible_residences(user_id).await,
        )
    }

    // -----------------------------------------------------------------
    // Actions and guards
    // -----------------------------------------------------------------

    async fn can_access(&self, user_id: Uuid, resource: ResourceRef) -> bool {
        match resource {
            ResourceRef::Organization(id) => self.can_user_access_organization(user_id, id).await,
            ResourceRef::Building(id) => self.can_user_access_building(user_id, id).await,
            ResourceRef::Residence(id) => self.can_user_access_residence(user_id, id).await,
        }
    }

    async fn try_write_allowed(&self, user_id: Uuid) -> KoveoResult<bool> {
        if !self.config.demo_roles_read_only {
            return Ok(true);
        }
        let user = self.users.get_by_id(user_id).await?;
        if user.role.is_demo() {
            debug!(%user_id, role = %user.role, "demo role is read-only");
            return Ok(false);
        }
        Ok(true)
    }

    /// Resource access combined with the action rule: demo roles may
    /// only read when `demo_roles_read_only` is set.
    pub async fn can_user_perform(
        &self,
        user_id: Uuid,
        action: Action,
        resource: ResourceRef,
    ) -> bool {
        if !self.can_access(user_id, resource).await {
            return false;
        }
        match action {
            Action::Read => true,
            Action::Write => deny_on_error(
                "write",
                user_id,
                self.try_write_allowed(user_id).await,
            ),
        }
    }

    /// Read check over untrusted id strings. Malformed ids are denied.
    pub async fn check_raw(&self, user_raw: &str, kind: ResourceKind, resource_raw: &str) -> bool {
        let parsed = crate::resource::parse_id(user_raw)
            .and_then(|user_id| Ok((user_id, ResourceRef::parse(kind, resource_raw)?)));
        match parsed {
            Ok((user_id, resource)) => self.can_access(user_id, resource).await,
            Err(e) => {
                debug!(error = %e, "rejecting raw access check");
                false
            }
        }
    }

    /// Guard form of [`Self::can_user_perform`] for `?` use in handlers.
    pub async fn require(
        &self,
        user_id: Uuid,
        action: Action,
        resource: ResourceRef,
    ) -> KoveoResult<()> {
        if self.can_user_perform(user_id, action, resource).await {
            Ok(())
        } else {
            Err(AuthzError::Denied { resource }.into())
        }
    }

    pub async fn require_organization_access(
        &self,
        user_id: Uuid,
        organization_id: Uuid,
    ) -> KoveoResult<()> {
        self.require(user_id, Action::Read, ResourceRef::Organization(organization_id))
            .await
    }

    pub async fn require_building_access(&self, user_id: Uuid, building_id: Uuid) -> KoveoResult<()> {
        self.require(user_id, Action::Read, ResourceRef::Building(building_id))
            .await
    }

    pub async fn require_residence_access(
        &self,
        user_id: Uuid,
        residence_id: Uuid,
    ) -> KoveoResult<()> {
        self.require(user_id, Action::Read, ResourceRef::Residence(residence_id))
            .await
    }
}

fn push_unique(ids: &mut Vec<Uuid>, id: Uuid) {
    if !ids.contains(&id) {
        ids.push(id);
    }
}
