use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{Building, Complex, ComplexPatch, NewBuilding, NewComplex};
use crate::database::store::ComplexStore;
use crate::policy::{AccessPolicy, Actor, OwnerLookup};
use crate::services::error::ServiceError;
use crate::types::{BuildingId, ComplexId};

/// Complexes and their buildings. Also answers "does this building belong
/// to that complex" for the other services.
#[derive(Clone)]
pub struct ComplexService {
    store: Arc<dyn ComplexStore>,
}

impl ComplexService {
    pub fn new(store: Arc<dyn ComplexStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Complex>, ServiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: ComplexId) -> Result<Complex, ServiceError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Complex not found"))
    }

    /// The complex, only if `building_id` is one of its buildings
    pub async fn find_with_building(
        &self,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Option<Complex>, DatabaseError> {
        self.store.find_with_building(complex_id, building_id).await
    }

    pub async fn create(&self, actor: &Actor, data: NewComplex) -> Result<Complex, ServiceError> {
        AccessPolicy::evaluate_admin(actor).into_result()?;

        let complex = self.store.create(data).await?;
        info!(
            "Complex {} created by {} with {} buildings",
            complex.id,
            actor.user_id(),
            complex.buildings.len()
        );
        Ok(complex)
    }

    pub async fn update(
        &self,
        actor: &Actor,
        id: ComplexId,
        patch: ComplexPatch,
    ) -> Result<Complex, ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::bad_request("At least one field must not be empty!"));
        }
        AccessPolicy::evaluate_resource_access(actor, id, self)
            .await?
            .into_result()?;

        self.store
            .update_by_id(id, patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("Complex not found"))
    }

    pub async fn delete(&self, actor: &Actor, id: ComplexId) -> Result<Complex, ServiceError> {
        self.get(id).await?;
        AccessPolicy::evaluate_admin(actor).into_result()?;

        let complex = self
            .store
            .delete_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Complex not found"))?;
        info!("Complex {} deleted by {}", id, actor.user_id());
        Ok(complex)
    }

    pub async fn add_building(
        &self,
        actor: &Actor,
        complex_id: ComplexId,
        data: NewBuilding,
    ) -> Result<Building, ServiceError> {
        AccessPolicy::evaluate_resource_access(actor, complex_id, self)
            .await?
            .into_result()?;

        let building = self
            .store
            .add_building(complex_id, data)
            .await?
            .ok_or_else(|| ServiceError::not_found("Complex not found"))?;
        info!("Building {} added to complex {}", building.id, complex_id);
        Ok(building)
    }

    pub async fn remove_building(
        &self,
        actor: &Actor,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Building, ServiceError> {
        AccessPolicy::evaluate_resource_access(actor, complex_id, self)
            .await?
            .into_result()?;

        let building = self
            .store
            .remove_building(complex_id, building_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Building not found in this complex"))?;
        info!("Building {} removed from complex {}", building_id, complex_id);
        Ok(building)
    }
}

#[async_trait]
impl OwnerLookup<ComplexId> for ComplexService {
    fn resource_kind(&self) -> &'static str {
        "Complex"
    }

    /// A complex owns itself
    async fn owning_complex(&self, id: ComplexId) -> Result<Option<ComplexId>, DatabaseError> {
        Ok(self.store.find_by_id(id).await?.map(|c| c.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::database::models::BuildingMembership;
    use crate::types::UserId;

    fn service() -> ComplexService {
        ComplexService::new(Arc::new(MemoryStore::new()))
    }

    fn admin() -> Actor {
        Actor::new(UserId::generate(), true, vec![])
    }

    fn new_complex() -> NewComplex {
        NewComplex {
            name: "Green Hills".into(),
            address: "12 Park Ave".into(),
            buildings: vec![NewBuilding { name: "A".into(), address: None }],
        }
    }

    #[tokio::test]
    async fn only_admin_creates_complexes() {
        let service = service();
        let moderator = Actor::new(
            UserId::generate(),
            false,
            vec![BuildingMembership { complex_id: ComplexId::generate(), moderator: true }],
        );
        let err = service.create(&moderator, new_complex()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let complex = service.create(&admin(), new_complex()).await.unwrap();
        assert_eq!(complex.buildings.len(), 1);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn moderator_updates_own_complex_only() {
        let service = service();
        let complex = service.create(&admin(), new_complex()).await.unwrap();
        let moderator = Actor::new(
            UserId::generate(),
            false,
            vec![BuildingMembership { complex_id: complex.id, moderator: true }],
        );
        let resident = Actor::new(
            UserId::generate(),
            false,
            vec![BuildingMembership { complex_id: complex.id, moderator: false }],
        );
        let patch = || ComplexPatch { name: Some("Renamed".into()), address: None };

        let updated = service.update(&moderator, complex.id, patch()).await.unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.address, "12 Park Ave");

        let err = service.update(&resident, complex.id, patch()).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn update_checks_payload_then_existence() {
        let service = service();
        let err = service
            .update(&admin(), ComplexId::generate(), ComplexPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::BadRequest(_)));

        let outsider = Actor::new(UserId::generate(), false, vec![]);
        let err = service
            .update(&outsider, ComplexId::generate(), ComplexPatch { name: Some("x".into()), address: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn buildings_are_added_and_removed() {
        let service = service();
        let complex = service.create(&admin(), new_complex()).await.unwrap();

        let building = service
            .add_building(&admin(), complex.id, NewBuilding { name: "B".into(), address: Some("12b".into()) })
            .await
            .unwrap();
        assert!(service.find_with_building(complex.id, building.id).await.unwrap().is_some());

        service.remove_building(&admin(), complex.id, building.id).await.unwrap();
        assert!(service.find_with_building(complex.id, building.id).await.unwrap().is_none());

        let err = service
            .remove_building(&admin(), complex.id, building.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_reports_missing_before_forbidden() {
        let service = service();
        let resident = Actor::new(UserId::generate(), false, vec![]);
        let err = service.delete(&resident, ComplexId::generate()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));

        let complex = service.create(&admin(), new_complex()).await.unwrap();
        let err = service.delete(&resident, complex.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        service.delete(&admin(), complex.id).await.unwrap();
        assert!(matches!(service.get(complex.id).await, Err(ServiceError::NotFound(_))));
    }
}
