//! In-memory implementation of [`ResidenceRepository`].

use chrono::Utc;
use koveo_core::error::KoveoResult;
use koveo_core::models::residence::{CreateResidence, Residence};
use koveo_core::repository::ResidenceRepository;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct InMemoryResidenceRepository {
    store: MemoryStore,
}

impl InMemoryResidenceRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl ResidenceRepository for InMemoryResidenceRepository {
    async fn create(&self, input: CreateResidence) -> KoveoResult<Residence> {
        let mut tables = self.store.write().await?;
        if !tables.buildings.contains_key(&input.building_id) {
            return Err(StoreError::not_found("building", input.building_id).into());
        }
        let duplicate_unit = tables
            .residences
            .values()
            .any(|r| r.building_id == input.building_id && r.unit_number == input.unit_number);
        if duplicate_unit {
            return Err(StoreError::Conflict {
                entity: "residence".into(),
            }
            .into());
        }

        let now = Utc::now();
        let residence = Residence {
            id: Uuid::new_v4(),
            building_id: input.building_id,
            unit_number: input.unit_number,
            floor: input.floor,
            square_footage: input.square_footage,
            created_at: now,
            updated_at: now,
        };
        tables.residences.insert(residence.id, residence.clone());
        Ok(residence)
    }

    async fn get_by_id(&self, id: Uuid) -> KoveoResult<Residence> {
        let tables = self.store.read().await?;
        tables
            .residences
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("residence", id).into())
    }

    async fn list_by_building(&self, building_id: Uuid) -> KoveoResult<Vec<Residence>> {
        let tables = self.store.read().await?;
        let mut residences: Vec<Residence> = tables
            .residences
            .values()
            .filter(|r| r.building_id == building_id)
            .cloned()
            .collect();
        residences.sort_by(|a, b| a.unit_number.cmp(&b.unit_number));
        Ok(residences)
    }
}
