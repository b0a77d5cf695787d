use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ComplexId, UserId};

/// Relation between a user and one complex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildingMembership {
    pub complex_id: ComplexId,
    #[serde(default)]
    pub moderator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub buildings: Vec<BuildingMembership>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub name: String,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub buildings: Vec<BuildingMembership>,
}
