use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Building, Complex, ComplexPatch, ContactFields, ContactInfoRecord, NewBuilding, NewComplex,
    NewContactInfo, NewNotification, NewUser, Notification, User,
};
use crate::types::{BuildingId, ComplexId, ContactInfoId, NotificationId, UserId};

/// Building part of a contact-info scope.
///
/// `Unscoped` matches only records *without* a building id; it is not a
/// wildcard, since complex-level and building-level records are different slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildingScope {
    Building(BuildingId),
    Unscoped,
}

impl BuildingScope {
    pub fn building_id(&self) -> Option<BuildingId> {
        match self {
            BuildingScope::Building(id) => Some(*id),
            BuildingScope::Unscoped => None,
        }
    }

    pub fn matches(&self, building_id: Option<BuildingId>) -> bool {
        self.building_id() == building_id
    }
}

impl From<Option<BuildingId>> for BuildingScope {
    fn from(building_id: Option<BuildingId>) -> Self {
        building_id.map_or(BuildingScope::Unscoped, BuildingScope::Building)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactInfoFilter {
    pub complex_id: ComplexId,
    pub scope: BuildingScope,
}

impl ContactInfoFilter {
    pub fn matches(&self, record: &ContactInfoRecord) -> bool {
        record.complex_id == self.complex_id && self.scope.matches(record.building_id)
    }
}

#[async_trait]
pub trait ContactInfoStore: Send + Sync {
    async fn find(&self, filter: ContactInfoFilter) -> Result<Option<ContactInfoRecord>, DatabaseError>;

    async fn find_by_id(&self, id: ContactInfoId) -> Result<Option<ContactInfoRecord>, DatabaseError>;

    /// Complex-level record first, then building records in creation order
    async fn list_by_complex(&self, complex_id: ComplexId) -> Result<Vec<ContactInfoRecord>, DatabaseError>;

    /// Fails with `DatabaseError::Duplicate` when the scope is already taken
    async fn create(&self, data: NewContactInfo) -> Result<ContactInfoRecord, DatabaseError>;

    /// Shallow merge of `fields` into the stored document
    async fn update_by_id(
        &self,
        id: ContactInfoId,
        fields: ContactFields,
    ) -> Result<Option<ContactInfoRecord>, DatabaseError>;

    async fn delete_by_id(&self, id: ContactInfoId) -> Result<Option<ContactInfoRecord>, DatabaseError>;
}

#[async_trait]
pub trait ComplexStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Complex>, DatabaseError>;

    async fn find_by_id(&self, id: ComplexId) -> Result<Option<Complex>, DatabaseError>;

    /// The complex, only if `building_id` is one of its buildings
    async fn find_with_building(
        &self,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Option<Complex>, DatabaseError>;

    async fn create(&self, data: NewComplex) -> Result<Complex, DatabaseError>;

    async fn update_by_id(&self, id: ComplexId, patch: ComplexPatch) -> Result<Option<Complex>, DatabaseError>;

    async fn delete_by_id(&self, id: ComplexId) -> Result<Option<Complex>, DatabaseError>;

    async fn add_building(
        &self,
        complex_id: ComplexId,
        data: NewBuilding,
    ) -> Result<Option<Building>, DatabaseError>;

    async fn remove_building(
        &self,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Option<Building>, DatabaseError>;

    /// Insert or replace a complex and its buildings, keeping the given ids
    async fn upsert(&self, complex: Complex) -> Result<Complex, DatabaseError>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn create(&self, data: NewNotification) -> Result<Notification, DatabaseError>;

    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>, DatabaseError>;

    /// Newest first
    async fn list_by_complex(&self, complex_id: ComplexId) -> Result<Vec<Notification>, DatabaseError>;

    async fn delete_by_id(&self, id: NotificationId) -> Result<Option<Notification>, DatabaseError>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError>;

    async fn create(&self, data: NewUser) -> Result<User, DatabaseError>;

    /// Insert or replace a user, keeping the given id
    async fn upsert(&self, user: User) -> Result<User, DatabaseError>;
}

/// A backend serving every store, plus a liveness probe
#[async_trait]
pub trait Store: ContactInfoStore + ComplexStore + NotificationStore + UserStore {
    fn backend_name(&self) -> &'static str;

    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unscoped_filter_only_matches_missing_building() {
        let building = BuildingId::generate();
        assert!(BuildingScope::Unscoped.matches(None));
        assert!(!BuildingScope::Unscoped.matches(Some(building)));
        assert!(BuildingScope::Building(building).matches(Some(building)));
        assert!(!BuildingScope::Building(building).matches(None));
        assert!(!BuildingScope::Building(building).matches(Some(BuildingId::generate())));
    }

    #[test]
    fn scope_from_option() {
        let building = BuildingId::generate();
        assert_eq!(BuildingScope::from(Some(building)), BuildingScope::Building(building));
        assert_eq!(BuildingScope::from(None), BuildingScope::Unscoped);
    }
}
