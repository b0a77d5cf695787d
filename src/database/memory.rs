use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::database::manager::DatabaseError;
use crate::database::models::{
    Building, Complex, ComplexPatch, ContactFields, ContactInfoRecord, NewBuilding, NewComplex,
    NewContactInfo, NewNotification, NewUser, Notification, User,
};
use crate::database::store::{
    ComplexStore, ContactInfoFilter, ContactInfoStore, NotificationStore, Store, UserStore,
};
use crate::types::{BuildingId, ComplexId, ContactInfoId, NotificationId, UserId};

/// In-process store used for development and tests.
///
/// Records live in insertion order. Each write holds the collection's write
/// lock for its whole check-and-insert, so the contact-info scope stays unique
/// under concurrent creates.
#[derive(Default)]
pub struct MemoryStore {
    complexes: RwLock<Vec<Complex>>,
    contact_info: RwLock<Vec<ContactInfoRecord>>,
    notifications: RwLock<Vec<Notification>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactInfoStore for MemoryStore {
    async fn find(&self, filter: ContactInfoFilter) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let records = self.contact_info.read().await;
        Ok(records.iter().find(|r| filter.matches(r)).cloned())
    }

    async fn find_by_id(&self, id: ContactInfoId) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let records = self.contact_info.read().await;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    async fn list_by_complex(&self, complex_id: ComplexId) -> Result<Vec<ContactInfoRecord>, DatabaseError> {
        let records = self.contact_info.read().await;
        let mut matching: Vec<ContactInfoRecord> = records
            .iter()
            .filter(|r| r.complex_id == complex_id)
            .cloned()
            .collect();
        // stable: building records keep creation order
        matching.sort_by_key(|r| r.building_id.is_some());
        Ok(matching)
    }

    async fn create(&self, data: NewContactInfo) -> Result<ContactInfoRecord, DatabaseError> {
        let mut records = self.contact_info.write().await;
        let filter = ContactInfoFilter {
            complex_id: data.complex_id,
            scope: data.building_id.into(),
        };
        if records.iter().any(|r| filter.matches(r)) {
            return Err(DatabaseError::Duplicate("contact info for this scope".to_string()));
        }

        let now = Utc::now();
        let record = ContactInfoRecord {
            id: ContactInfoId::generate(),
            complex_id: data.complex_id,
            building_id: data.building_id,
            fields: data.fields,
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());
        debug!("memory: stored contact info {}", record.id);
        Ok(record)
    }

    async fn update_by_id(
        &self,
        id: ContactInfoId,
        fields: ContactFields,
    ) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let mut records = self.contact_info.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        record.fields.extend(fields);
        record.updated_at = Utc::now();
        Ok(Some(record.clone()))
    }

    async fn delete_by_id(&self, id: ContactInfoId) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let mut records = self.contact_info.write().await;
        Ok(records
            .iter()
            .position(|r| r.id == id)
            .map(|index| records.remove(index)))
    }
}

#[async_trait]
impl ComplexStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Complex>, DatabaseError> {
        Ok(self.complexes.read().await.clone())
    }

    async fn find_by_id(&self, id: ComplexId) -> Result<Option<Complex>, DatabaseError> {
        let complexes = self.complexes.read().await;
        Ok(complexes.iter().find(|c| c.id == id).cloned())
    }

    async fn find_with_building(
        &self,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Option<Complex>, DatabaseError> {
        let complexes = self.complexes.read().await;
        Ok(complexes
            .iter()
            .find(|c| c.id == complex_id && c.has_building(building_id))
            .cloned())
    }

    async fn create(&self, data: NewComplex) -> Result<Complex, DatabaseError> {
        let now = Utc::now();
        let complex = Complex {
            id: ComplexId::generate(),
            name: data.name,
            address: data.address,
            buildings: data
                .buildings
                .into_iter()
                .map(|b| Building {
                    id: BuildingId::generate(),
                    name: b.name,
                    address: b.address,
                })
                .collect(),
            created_at: now,
            updated_at: now,
        };
        self.complexes.write().await.push(complex.clone());
        Ok(complex)
    }

    async fn update_by_id(&self, id: ComplexId, patch: ComplexPatch) -> Result<Option<Complex>, DatabaseError> {
        let mut complexes = self.complexes.write().await;
        let Some(complex) = complexes.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(name) = patch.name {
            complex.name = name;
        }
        if let Some(address) = patch.address {
            complex.address = address;
        }
        complex.updated_at = Utc::now();
        Ok(Some(complex.clone()))
    }

    async fn delete_by_id(&self, id: ComplexId) -> Result<Option<Complex>, DatabaseError> {
        let mut complexes = self.complexes.write().await;
        Ok(complexes
            .iter()
            .position(|c| c.id == id)
            .map(|index| complexes.remove(index)))
    }

    async fn add_building(
        &self,
        complex_id: ComplexId,
        data: NewBuilding,
    ) -> Result<Option<Building>, DatabaseError> {
        let mut complexes = self.complexes.write().await;
        let Some(complex) = complexes.iter_mut().find(|c| c.id == complex_id) else {
            return Ok(None);
        };
        let building = Building {
            id: BuildingId::generate(),
            name: data.name,
            address: data.address,
        };
        complex.buildings.push(building.clone());
        complex.updated_at = Utc::now();
        Ok(Some(building))
    }

    async fn remove_building(
        &self,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Option<Building>, DatabaseError> {
        let mut complexes = self.complexes.write().await;
        let Some(complex) = complexes.iter_mut().find(|c| c.id == complex_id) else {
            return Ok(None);
        };
        let Some(index) = complex.buildings.iter().position(|b| b.id == building_id) else {
            return Ok(None);
        };
        complex.updated_at = Utc::now();
        Ok(Some(complex.buildings.remove(index)))
    }

    async fn upsert(&self, complex: Complex) -> Result<Complex, DatabaseError> {
        let mut complexes = self.complexes.write().await;
        match complexes.iter_mut().find(|c| c.id == complex.id) {
            Some(existing) => *existing = complex.clone(),
            None => complexes.push(complex.clone()),
        }
        Ok(complex)
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn create(&self, data: NewNotification) -> Result<Notification, DatabaseError> {
        let notification = Notification {
            id: NotificationId::generate(),
            complex_id: data.complex_id,
            author_id: data.author_id,
            title: data.title,
            body: data.body,
            created_at: Utc::now(),
        };
        self.notifications.write().await.push(notification.clone());
        Ok(notification)
    }

    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>, DatabaseError> {
        let notifications = self.notifications.read().await;
        Ok(notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn list_by_complex(&self, complex_id: ComplexId) -> Result<Vec<Notification>, DatabaseError> {
        let notifications = self.notifications.read().await;
        Ok(notifications
            .iter()
            .rev()
            .filter(|n| n.complex_id == complex_id)
            .cloned()
            .collect())
    }

    async fn delete_by_id(&self, id: NotificationId) -> Result<Option<Notification>, DatabaseError> {
        let mut notifications = self.notifications.write().await;
        Ok(notifications
            .iter()
            .position(|n| n.id == id)
            .map(|index| notifications.remove(index)))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn create(&self, data: NewUser) -> Result<User, DatabaseError> {
        let user = User {
            id: UserId::generate(),
            name: data.name,
            is_admin: data.is_admin,
            buildings: data.buildings,
            created_at: Utc::now(),
        };
        self.users.write().await.push(user.clone());
        Ok(user)
    }

    async fn upsert(&self, user: User) -> Result<User, DatabaseError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id == user.id) {
            Some(existing) => *existing = user.clone(),
            None => users.push(user.clone()),
        }
        Ok(user)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
