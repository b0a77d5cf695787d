use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{NewNotification, Notification};
use crate::database::store::NotificationStore;
use crate::policy::{AccessPolicy, Actor, OwnerLookup};
use crate::services::complex_service::ComplexService;
use crate::services::error::ServiceError;
use crate::types::{ComplexId, NotificationId};

/// Announcements posted to the residents of one complex
#[derive(Clone)]
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
    complexes: ComplexService,
}

impl NotificationService {
    pub fn new(store: Arc<dyn NotificationStore>, complexes: ComplexService) -> Self {
        Self { store, complexes }
    }

    pub async fn create(
        &self,
        actor: &Actor,
        complex_id: ComplexId,
        title: String,
        body: String,
    ) -> Result<Notification, ServiceError> {
        AccessPolicy::evaluate_resource_access(actor, complex_id, &self.complexes)
            .await?
            .into_result()?;

        let notification = self
            .store
            .create(NewNotification {
                complex_id,
                author_id: actor.user_id(),
                title,
                body,
            })
            .await?;
        info!("Notification {} posted to complex {}", notification.id, complex_id);
        Ok(notification)
    }

    /// Newest first; readable by every member of the complex
    pub async fn list(&self, actor: &Actor, complex_id: ComplexId) -> Result<Vec<Notification>, ServiceError> {
        self.complexes.get(complex_id).await?;
        AccessPolicy::evaluate_membership(actor, complex_id).into_result()?;
        Ok(self.store.list_by_complex(complex_id).await?)
    }

    pub async fn delete(&self, actor: &Actor, id: NotificationId) -> Result<Notification, ServiceError> {
        AccessPolicy::evaluate_resource_access(actor, id, self)
            .await?
            .into_result()?;

        let notification = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Notification not found"))?;
        info!("Notification {} deleted by {}", id, actor.user_id());
        Ok(notification)
    }
}

#[async_trait]
impl OwnerLookup<NotificationId> for NotificationService {
    fn resource_kind(&self) -> &'static str {
        "Notification"
    }

    async fn owning_complex(&self, id: NotificationId) -> Result<Option<ComplexId>, DatabaseError> {
        Ok(self.store.find_by_id(id).await?.map(|n| n.complex_id))
    }
}
