use std::sync::Arc;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewUser, User};
use crate::database::store::UserStore;
use crate::policy::{AccessPolicy, Actor};
use crate::services::error::ServiceError;
use crate::types::UserId;

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    /// Actor for a token subject; `None` when the user no longer exists
    pub async fn find_actor(&self, id: UserId) -> Result<Option<Actor>, DatabaseError> {
        Ok(self.store.find_by_id(id).await?.as_ref().map(Actor::from))
    }

    pub async fn create(&self, actor: &Actor, data: NewUser) -> Result<User, ServiceError> {
        AccessPolicy::evaluate_admin(actor).into_result()?;

        let user = self.store.create(data).await?;
        info!(
            "User {} created by {} (admin: {}, {} memberships)",
            user.id,
            actor.user_id(),
            user.is_admin,
            user.buildings.len()
        );
        Ok(user)
    }
}
