use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{BuildingId, ComplexId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Building {
    pub id: BuildingId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Complex {
    pub id: ComplexId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub buildings: Vec<Building>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Complex {
    pub fn has_building(&self, building_id: BuildingId) -> bool {
        self.buildings.iter().any(|b| b.id == building_id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewBuilding {
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComplex {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub buildings: Vec<NewBuilding>,
}

/// Partial update of a complex; `None` leaves the column untouched
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ComplexPatch {
    pub name: Option<String>,
    pub address: Option<String>,
}

impl ComplexPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.address.is_none()
    }
}
