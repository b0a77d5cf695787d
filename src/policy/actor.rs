use serde::Serialize;
use std::collections::HashMap;

use crate::database::models::{BuildingMembership, User};
use crate::types::{ComplexId, UserId};

/// The authenticated caller of one request.
///
/// Built once per request by the auth middleware and handed explicitly to
/// every service operation.
#[derive(Debug, Clone, Serialize)]
pub struct Actor {
    user_id: UserId,
    is_admin: bool,
    buildings: Vec<BuildingMembership>,
    #[serde(skip)]
    memberships: HashMap<ComplexId, BuildingMembership>,
}

impl Actor {
    pub fn new(user_id: UserId, is_admin: bool, buildings: Vec<BuildingMembership>) -> Self {
        let mut memberships = HashMap::with_capacity(buildings.len());
        for membership in &buildings {
            // first membership for a complex wins
            memberships.entry(membership.complex_id).or_insert(*membership);
        }
        Self {
            user_id,
            is_admin,
            buildings,
            memberships,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    pub fn is_admin(&self) -> bool {
        self.is_admin
    }

    pub fn buildings(&self) -> &[BuildingMembership] {
        &self.buildings
    }

    pub fn membership(&self, complex_id: ComplexId) -> Option<&BuildingMembership> {
        self.memberships.get(&complex_id)
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Actor::new(user.id, user.is_admin, user.buildings.clone())
    }
}
