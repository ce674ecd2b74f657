//! In-memory implementation of [`BuildingRepository`].

use chrono::Utc;
use koveo_core::error::KoveoResult;
use koveo_core::models::building::{Building, CreateBuilding};
use koveo_core::repository::BuildingRepository;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct InMemoryBuildingRepository {
    store: MemoryStore,
}

impl InMemoryBuildingRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl BuildingRepository for InMemoryBuildingRepository {
    async fn create(&self, input: CreateBuilding) -> KoveoResult<Building> {
        let mut tables = self.store.write().await?;
        if !tables.organizations.contains_key(&input.organization_id) {
            return Err(StoreError::not_found("organization", input.organization_id).into());
        }

        let now = Utc::now();
        let building = Building {
            id: Uuid::new_v4(),
            organization_id: input.organization_id,
            name: input.name,
            address: input.address,
            city: input.city,
            postal_code: input.postal_code,
            created_at: now,
            updated_at: now,
        };
        tables.buildings.insert(building.id, building.clone());
        Ok(building)
    }

    async fn get_by_id(&self, id: Uuid) -> KoveoResult<Building> {
        let tables = self.store.read().await?;
        tables
            .buildings
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("building", id).into())
    }

    async fn list_by_organization(&self, organization_id: Uuid) -> KoveoResult<Vec<Building>> {
        let tables = self.store.read().await?;
        let mut buildings: Vec<Building> = tables
            .buildings
            .values()
            .filter(|b| b.organization_id == organization_id)
            .cloned()
            .collect();
        buildings.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(buildings)
    }
}
