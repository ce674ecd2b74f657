//! In-memory implementation of [`UserRepository`].
//!
//! Emails are stored as given; callers normalize them before they
//! reach the repository. Lookups by email compare case-insensitively.

use chrono::Utc;
use koveo_core::error::KoveoResult;
use koveo_core::models::user::{CreateUser, UpdateUser, User, UserStatus};
use koveo_core::repository::UserRepository;
use tracing::info;
use uuid::Uuid;

use crate::error::StoreError;
use crate::store::MemoryStore;

#[derive(Clone)]
pub struct InMemoryUserRepository {
    store: MemoryStore,
}

impl InMemoryUserRepository {
    pub fn new(store: MemoryStore) -> Self {
        Self { store }
    }
}

impl UserRepository for InMemoryUserRepository {
    async fn create(&self, input: CreateUser) -> KoveoResult<User> {
        let mut tables = self.store.write().await?;
        let taken = tables.users.values().any(|u| {
            u.email.eq_ignore_ascii_case(&input.email) || u.username == input.username
        });
        if taken {
            return Err(StoreError::Conflict {
                entity: "user".into(),
            }
            .into());
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            username: input.username,
            email: input.email,
            first_name: input.first_name,
            last_name: input.last_name,
            role: input.role,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> KoveoResult<User> {
        let tables = self.store.read().await?;
        tables
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", id).into())
    }

    async fn get_by_email(&self, email: &str) -> KoveoResult<User> {
        let tables = self.store.read().await?;
        tables
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", email).into())
    }

    async fn update(&self, id: Uuid, input: UpdateUser) -> KoveoResult<User> {
        let mut tables = self.store.write().await?;
        let taken = tables.users.values().any(|u| {
            u.id != id
                && (input
                    .email
                    .as_deref()
                    .is_some_and(|e| u.email.eq_ignore_ascii_case(e))
                    || input.username.as_deref() == Some(u.username.as_str()))
        });
        if taken {
            return Err(StoreError::Conflict {
                entity: "user".into(),
            }
            .into());
        }

        let user = tables
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;

        if let Some(username) = input.username {
            user.username = username;
        }
        if let Some(email) = input.email {
            user.email = email;
        }
        if let Some(first_name) = input.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = input.last_name {
            user.last_name = last_name;
        }
        if let Some(role) = input.role {
            info!(user_id = %id, from = %user.role, to = %role, "user role changed");
            user.role = role;
        }
        if let Some(status) = input.status {
            user.status = status;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    async fn deactivate(&self, id: Uuid) -> KoveoResult<()> {
        self.update(
            id,
            UpdateUser {
                status: Some(UserStatus::Inactive),
                ..Default::default()
            },
        )
        .await
        .map(|_| ())
    }
}
