//! Shared in-process store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use koveo_core::models::{
    building::Building, membership::Membership, organization::Organization, residence::Residence,
    user::User,
};
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::StoreError;

#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) organizations: HashMap<Uuid, Organization>,
    pub(crate) buildings: HashMap<Uuid, Building>,
    pub(crate) residences: HashMap<Uuid, Residence>,
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) memberships: HashMap<Uuid, Membership>,
}

/// In-memory backing store shared by every repository handle.
///
/// Cloning is cheap; clones see the same data. The store can be
/// switched to an unavailable state, in which every read and write
/// fails with [`StoreError::Unavailable`], to exercise callers'
/// failure paths.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
    unavailable: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        info!("Initializing in-memory store");
        Self::default()
    }

    /// Simulate an outage (`true`) or recover from one (`false`).
    pub fn set_unavailable(&self, unavailable: bool) {
        if unavailable {
            warn!("in-memory store marked unavailable");
        }
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable);
        }
        Ok(())
    }

    pub(crate) async fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, StoreError> {
        self.check_available()?;
        Ok(self.tables.read().await)
    }

    pub(crate) async fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, StoreError> {
        self.check_available()?;
        Ok(self.tables.write().await)
    }
}
