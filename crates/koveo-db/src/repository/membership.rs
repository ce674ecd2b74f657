//! In-memory implementation of [`MembershipRepository`].

use chrono::Utc;
use koveo_core::error::KoveoResult;
use koveo_core::models::membership::{CreateMembership, Membership};
use koveo_core::repository::MembershipRepository;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::{MemoryStore, Tables};

#[derive(Clone)]
pub struct InMemoryMembershipRepository {
    store: MemoryStore,
}

impl InMemoryMembershipRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

/// Reject memberships whose scope contradicts the tenancy hierarchy.
fn check_scope(tables: &Tables, input: &CreateMembership) -> Result<(), StoreError> {
    if !tables.users.contains_key(&input.user_id) {
        return Err(StoreError::not_found("user", input.user_id));
    }
    if !tables.organizations.contains_key(&input.organization_id) {
        return Err(StoreError::not_found("organization", input.organization_id));
    }

    if let Some(building_id) = input.building_id {
        let building = tables
            .buildings
            .get(&building_id)
            .ok_or_else(|| StoreError::not_found("building", building_id))?;
        if building.organization_id != input.organization_id {
            return Err(StoreError::Integrity(format!(
                "building {building_id} does not belong to organization {}",
                input.organization_id
            )));
        }
    }

    if let Some(residence_id) = input.residence_id {
        let residence = tables
            .residences
            .get(&residence_id)
            .ok_or_else(|| StoreError::not_found("residence", residence_id))?;
        if input.building_id != Some(residence.building_id) {
            return Err(StoreError::Integrity(format!(
                "residence {residence_id} membership must name its building {}",
                residence.building_id
            )));
        }
    }

    Ok(())
}

impl MembershipRepository for InMemoryMembershipRepository {
    async fn add(&self, input: CreateMembership) -> KoveoResult<Membership> {
        let mut tables = self.store.write().await?;
        check_scope(&tables, &input)?;

        let duplicate = tables.memberships.values().any(|m| {
            m.is_active
                && m.user_id == input.user_id
                && m.organization_id == input.organization_id
                && m.building_id == input.building_id
                && m.residence_id == input.residence_id
        });
        if duplicate {
            return Err(StoreError::Conflict {
                entity: "membership".into(),
            }
            .into());
        }

        let membership = Membership {
            id: Uuid::new_v4(),
            user_id: input.user_id,
            organization_id: input.organization_id,
            building_id: input.building_id,
            residence_id: input.residence_id,
            role: input.role,
            is_active: true,
            created_at: Utc::now(),
        };
        tables.memberships.insert(membership.id, membership.clone());
        Ok(membership)
    }

    async fn remove(&self, id: Uuid) -> KoveoResult<()> {
        let mut tables = self.store.write().await?;
        let membership = tables
            .memberships
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("membership", id))?;
        membership.is_active = false;
        Ok(())
    }

    async fn list_for_user(&self, user_id: Uuid) -> KoveoResult<Vec<Membership>> {
        let tables = self.store.read().await?;
        let mut memberships: Vec<Membership> = tables
            .memberships
            .values()
            .filter(|m| m.is_active && m.user_id == user_id)
            .cloned()
            .collect();
        memberships.sort_by_key(|m| m.created_at);
        Ok(memberships)
    }
}
