//! In-memory implementation of [`OrganizationRepository`].

use chrono::Utc;
use koveo_core::error::KoveoResult;
use koveo_core::models::organization::{CreateOrganization, Organization};
use koveo_core::repository::OrganizationRepository;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct InMemoryOrganizationRepository {
    store: MemoryStore,
}

impl InMemoryOrganizationRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl OrganizationRepository for InMemoryOrganizationRepository {
    async fn create(&self, input: CreateOrganization) -> KoveoResult<Organization> {
        let mut tables = self.store.write().await?;
        if tables.organizations.values().any(|o| o.name == input.name) {
            return Err(StoreError::Conflict {
                entity: "organization".into(),
            }
            .into());
        }

        let now = Utc::now();
        let org = Organization {
            id: Uuid::new_v4(),
            name: input.name,
            org_type: input.org_type,
            created_at: now,
            updated_at: now,
        };
        tables.organizations.insert(org.id, org.clone());
        Ok(org)
    }

    async fn get_by_id(&self, id: Uuid) -> KoveoResult<Organization> {
        let tables = self.store.read().await?;
        tables
            .organizations
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("organization", id).into())
    }

    async fn list(&self) -> KoveoResult<Vec<Organization>> {
        let tables = self.store.read().await?;
        let mut orgs: Vec<Organization> = tables.organizations.values().cloned().collect();
        orgs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(orgs)
    }
}
