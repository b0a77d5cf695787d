use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::database::manager::DatabaseError;
use crate::database::models::contact_info::find_system_field;
use crate::database::models::{ContactFields, ContactInfoRecord, NewContactInfo};
use crate::database::store::{ContactInfoFilter, ContactInfoStore};
use crate::policy::{AccessPolicy, Actor, OwnerLookup};
use crate::services::complex_service::ComplexService;
use crate::services::error::ServiceError;
use crate::types::{BuildingId, ComplexId, ContactInfoId};

const DUPLICATE_MESSAGE: &str =
    "This contact information already exists, so you can't write down this contact information once more";

/// Contact info of a complex, or of one building within it.
///
/// One record per scope: `(complex, building)` or `(complex, no building)`.
#[derive(Clone)]
pub struct ContactInfoService {
    store: Arc<dyn ContactInfoStore>,
    complexes: ComplexService,
}

impl ContactInfoService {
    pub fn new(store: Arc<dyn ContactInfoStore>, complexes: ComplexService) -> Self {
        Self { store, complexes }
    }

    pub async fn get(&self, id: ContactInfoId) -> Result<ContactInfoRecord, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact info not found"))
    }

    pub async fn list_by_complex(&self, complex_id: ComplexId) -> Result<Vec<ContactInfoRecord>, ServiceError> {
        Ok(self.store.list_by_complex(complex_id).await?)
    }

    pub async fn create(
        &self,
        actor: &Actor,
        complex_id: ComplexId,
        building_id: Option<BuildingId>,
        payload: ContactFields,
    ) -> Result<ContactInfoRecord, ServiceError> {
        reject_system_fields(&payload)?;
        AccessPolicy::evaluate_complex_access(actor, complex_id, building_id).into_result()?;

        let filter = ContactInfoFilter {
            complex_id,
            scope: building_id.into(),
        };
        if let Some(existing) = self.store.find(filter).await? {
            warn!(
                "Contact info for complex {} (building {:?}) already exists as {}",
                complex_id, building_id, existing.id
            );
            return Err(ServiceError::conflict(DUPLICATE_MESSAGE));
        }

        // An id that is not one of the complex's buildings is dropped, not rejected
        let building_id = match building_id {
            Some(building_id) => {
                let belongs = self
                    .complexes
                    .find_with_building(complex_id, building_id)
                    .await?
                    .is_some();
                if !belongs {
                    debug!(
                        "Building {} is not part of complex {}, storing complex-level contact info",
                        building_id, complex_id
                    );
                }
                belongs.then_some(building_id)
            }
            None => None,
        };

        let record = self
            .store
            .create(NewContactInfo {
                complex_id,
                building_id,
                fields: payload,
            })
            .await
            .map_err(|e| match e {
                DatabaseError::Duplicate(_) => ServiceError::conflict(DUPLICATE_MESSAGE),
                other => other.into(),
            })?;

        info!("Contact info {} created for complex {} by {}", record.id, complex_id, actor.user_id());
        Ok(record)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: ContactInfoId,
        payload: ContactFields,
    ) -> Result<ContactInfoRecord, ServiceError> {
        if payload.is_empty() {
            return Err(ServiceError::bad_request("At least one field must not be empty!"));
        }
        reject_system_fields(&payload)?;

        AccessPolicy::evaluate_resource_access(actor, id, self)
            .await?
            .into_result()?;

        let record = self
            .store
            .update_by_id(id, payload)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact info not found"))?;
        info!("Contact info {} updated by {}", id, actor.user_id());
        Ok(record)
    }

    /// Returns the removed record
    pub async fn delete(&self, actor: &Actor, id: ContactInfoId) -> Result<ContactInfoRecord, ServiceError> {
        AccessPolicy::evaluate_resource_access(actor, id, self)
            .await?
            .into_result()?;

        let record = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Contact info not found"))?;
        info!("Contact info {} deleted by {}", id, actor.user_id());
        Ok(record)
    }
}

#[async_trait]
impl OwnerLookup<ContactInfoId> for ContactInfoService {
    fn resource_kind(&self) -> &'static str {
        "Contact info"
    }

    async fn owning_complex(&self, id: ContactInfoId) -> Result<Option<ComplexId>, DatabaseError> {
        Ok(self.store.find_by_id(id).await?.map(|record| record.complex_id))
    }
}

fn reject_system_fields(payload: &ContactFields) -> Result<(), ServiceError> {
    match find_system_field(payload) {
        Some(field) => Err(ServiceError::bad_request(format!(
            "System field '{}' cannot be set via API",
            field
        ))),
        None => Ok(()),
    }
}
