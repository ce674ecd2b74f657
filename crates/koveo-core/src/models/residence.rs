//! Residence domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Residence {
    pub id: Uuid,
    /// The building this residence belongs to.
    pub building_id: Uuid,
    pub unit_number: String,
    pub floor: Option<i32>,
    pub square_footage: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResidence {
    pub building_id: Uuid,
    pub unit_number: String,
    pub floor: Option<i32>,
    pub square_footage: Option<f64>,
}
