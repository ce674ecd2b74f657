//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. The access-control resolver
//! only ever calls the read methods; writes exist for provisioning and
//! for tests.

use uuid::Uuid;

use crate::error::KoveoResult;
use crate::models::{
    building::{Building, CreateBuilding},
    membership::{CreateMembership, Membership},
    organization::{CreateOrganization, Organization},
    residence::{CreateResidence, Residence},
    user::{CreateUser, UpdateUser, User},
};

// ---------------------------------------------------------------------------
// Tenancy hierarchy
// ---------------------------------------------------------------------------

pub trait OrganizationRepository: Send + Sync {
    fn create(
        &self,
        input: CreateOrganization,
    ) -> impl Future<Output = KoveoResult<Organization>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = KoveoResult<Organization>> + Send;
    /// Every organization in the system (admin bypass).
    fn list(&self) -> impl Future<Output = KoveoResult<Vec<Organization>>> + Send;
}

pub trait BuildingRepository: Send + Sync {
    fn create(&self, input: CreateBuilding) -> impl Future<Output = KoveoResult<Building>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = KoveoResult<Building>> + Send;
    fn list_by_organization(
        &self,
        organization_id: Uuid,
    ) -> impl Future<Output = KoveoResult<Vec<Building>>> + Send;
}

pub trait ResidenceRepository: Send + Sync {
    fn create(
        &self,
        input: CreateResidence,
    ) -> impl Future<Output = KoveoResult<Residence>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = KoveoResult<Residence>> + Send;
    fn list_by_building(
        &self,
        building_id: Uuid,
    ) -> impl Future<Output = KoveoResult<Vec<Residence>>> + Send;
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

pub trait UserRepository: Send + Sync {
    fn create(&self, input: CreateUser) -> impl Future<Output = KoveoResult<User>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = KoveoResult<User>> + Send;
    fn get_by_email(&self, email: &str) -> impl Future<Output = KoveoResult<User>> + Send;
    fn update(
        &self,
        id: Uuid,
        input: UpdateUser,
    ) -> impl Future<Output = KoveoResult<User>> + Send;
    /// Soft-delete: sets status to Inactive.
    fn deactivate(&self, id: Uuid) -> impl Future<Output = KoveoResult<()>> + Send;
}

/// The membership-lookup collaborator consumed by the access resolver.
pub trait MembershipRepository: Send + Sync {
    fn add(
        &self,
        input: CreateMembership,
    ) -> impl Future<Output = KoveoResult<Membership>> + Send;
    /// Marks a membership inactive. Inactive memberships are never
    /// returned by [`Self::list_for_user`].
    fn remove(&self, id: Uuid) -> impl Future<Output = KoveoResult<()>> + Send;
    /// Active memberships held by `user_id`. An unknown user yields an
    /// empty list.
    fn list_for_user(
        &self,
        user_id: Uuid,
    ) -> impl Future<Output = KoveoResult<Vec<Membership>>> + Send;
}
