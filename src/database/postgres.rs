use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{
    Building, BuildingMembership, Complex, ComplexPatch, ContactFields, ContactInfoRecord,
    NewBuilding, NewComplex, NewContactInfo, NewNotification, NewUser, Notification, User,
};
use crate::database::store::{
    BuildingScope, ComplexStore, ContactInfoFilter, ContactInfoStore, NotificationStore, Store,
    UserStore,
};
use crate::types::{BuildingId, ComplexId, ContactInfoId, NotificationId, UserId};

const CONTACT_COLUMNS: &str = "id, complex_id, building_id, fields, created_at, updated_at";
const NOTIFICATION_COLUMNS: &str = "id, complex_id, author_id, title, body, created_at";

/// Store backed by a Postgres pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_buildings(&self, complex_id: ComplexId) -> Result<Vec<Building>, DatabaseError> {
        let rows = sqlx::query(
            "SELECT id, name, address FROM buildings WHERE complex_id = $1 ORDER BY position",
        )
        .bind(complex_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(building_from_row)
            .collect::<Result<_, _>>()
            .map_err(DatabaseError::from)
    }

    async fn load_complex(&self, row: &PgRow) -> Result<Complex, DatabaseError> {
        let id: ComplexId = row.try_get("id")?;
        Ok(Complex {
            id,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            buildings: self.load_buildings(id).await?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

fn building_from_row(row: &PgRow) -> Result<Building, sqlx::Error> {
    Ok(Building {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        address: row.try_get("address")?,
    })
}

fn contact_info_from_row(row: &PgRow) -> Result<ContactInfoRecord, sqlx::Error> {
    let Json(fields): Json<ContactFields> = row.try_get("fields")?;
    Ok(ContactInfoRecord {
        id: row.try_get("id")?,
        complex_id: row.try_get("complex_id")?,
        building_id: row.try_get("building_id")?,
        fields,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn notification_from_row(row: &PgRow) -> Result<Notification, sqlx::Error> {
    Ok(Notification {
        id: row.try_get("id")?,
        complex_id: row.try_get("complex_id")?,
        author_id: row.try_get("author_id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        created_at: row.try_get("created_at")?,
    })
}

fn user_from_row(row: &PgRow) -> Result<User, sqlx::Error> {
    let Json(buildings): Json<Vec<BuildingMembership>> = row.try_get("buildings")?;
    Ok(User {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        is_admin: row.try_get("is_admin")?,
        buildings,
        created_at: row.try_get("created_at")?,
    })
}

#[async_trait]
impl ContactInfoStore for PgStore {
    async fn find(&self, filter: ContactInfoFilter) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let row = match filter.scope {
            BuildingScope::Building(building_id) => {
                sqlx::query(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contact_info WHERE complex_id = $1 AND building_id = $2"
                ))
                .bind(filter.complex_id)
                .bind(building_id)
                .fetch_optional(&self.pool)
                .await?
            }
            BuildingScope::Unscoped => {
                sqlx::query(&format!(
                    "SELECT {CONTACT_COLUMNS} FROM contact_info WHERE complex_id = $1 AND building_id IS NULL"
                ))
                .bind(filter.complex_id)
                .fetch_optional(&self.pool)
                .await?
            }
        };
        Ok(row.as_ref().map(contact_info_from_row).transpose()?)
    }

    async fn find_by_id(&self, id: ContactInfoId) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let row = sqlx::query(&format!("SELECT {CONTACT_COLUMNS} FROM contact_info WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(contact_info_from_row).transpose()?)
    }

    async fn list_by_complex(&self, complex_id: ComplexId) -> Result<Vec<ContactInfoRecord>, DatabaseError> {
        let rows = sqlx::query(&format!(
            "SELECT {CONTACT_COLUMNS} FROM contact_info WHERE complex_id = $1 \
             ORDER BY building_id IS NOT NULL, created_at"
        ))
        .bind(complex_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(contact_info_from_row).collect::<Result<_, _>>()?)
    }

    async fn create(&self, data: NewContactInfo) -> Result<ContactInfoRecord, DatabaseError> {
        let row = sqlx::query(&format!(
            "INSERT INTO contact_info (id, complex_id, building_id, fields) VALUES ($1, $2, $3, $4) \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(ContactInfoId::generate())
        .bind(data.complex_id)
        .bind(data.building_id)
        .bind(Json(&data.fields))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DatabaseError::from_write(e, "contact info for this scope"))?;
        Ok(contact_info_from_row(&row)?)
    }

    async fn update_by_id(
        &self,
        id: ContactInfoId,
        fields: ContactFields,
    ) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let row = sqlx::query(&format!(
            "UPDATE contact_info SET fields = fields || $2, updated_at = now() WHERE id = $1 \
             RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .bind(Json(&fields))
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(contact_info_from_row).transpose()?)
    }

    async fn delete_by_id(&self, id: ContactInfoId) -> Result<Option<ContactInfoRecord>, DatabaseError> {
        let row = sqlx::query(&format!(
            "DELETE FROM contact_info WHERE id = $1 RETURNING {CONTACT_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(contact_info_from_row).transpose()?)
    }
}

#[async_trait]
impl ComplexStore for PgStore {
    async fn list(&self) -> Result<Vec<Complex>, DatabaseError> {
        let rows = sqlx::query("SELECT id, name, address, created_at, updated_at FROM complexes ORDER BY created_at")
            .fetch_all(&self.pool)
            .await?;

        let mut complexes = Vec::with_capacity(rows.len());
        for row in &rows {
            complexes.push(self.load_complex(row).await?);
        }
        Ok(complexes)
    }

    async fn find_by_id(&self, id: ComplexId) -> Result<Option<Complex>, DatabaseError> {
        let row = sqlx::query("SELECT id, name, address, created_at, updated_at FROM complexes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some(row) => Ok(Some(self.load_complex(&row).await?)),
            None => Ok(None),
        }
    }

    async fn find_with_building(
        &self,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Option<Complex>, DatabaseError> {
        let row = sqlx::query(
            "SELECT c.id, c.name, c.address, c.created_at, c.updated_at FROM complexes c \
             WHERE c.id = $1 AND EXISTS (SELECT 1 FROM buildings b WHERE b.complex_id = c.id AND b.id = $2)",
        )
        .bind(complex_id)
        .bind(building_id)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(Some(self.load_complex(&row).await?)),
            None => Ok(None),
        }
    }

    async fn create(&self, data: NewComplex) -> Result<Complex, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        let id = ComplexId::generate();
        let row = sqlx::query(
            "INSERT INTO complexes (id, name, address) VALUES ($1, $2, $3) \
             RETURNING id, name, address, created_at, updated_at",
        )
        .bind(id)
        .bind(&data.name)
        .bind(&data.address)
        .fetch_one(&mut *tx)
        .await?;

        let mut buildings = Vec::with_capacity(data.buildings.len());
        for building in data.buildings {
            let row = sqlx::query(
                "INSERT INTO buildings (id, complex_id, name, address) VALUES ($1, $2, $3, $4) \
                 RETURNING id, name, address",
            )
            .bind(BuildingId::generate())
            .bind(id)
            .bind(&building.name)
            .bind(&building.address)
            .fetch_one(&mut *tx)
            .await?;
            buildings.push(building_from_row(&row)?);
        }
        tx.commit().await?;

        Ok(Complex {
            id,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            buildings,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn update_by_id(&self, id: ComplexId, patch: ComplexPatch) -> Result<Option<Complex>, DatabaseError> {
        let row = sqlx::query(
            "UPDATE complexes SET name = COALESCE($2, name), address = COALESCE($3, address), \
             updated_at = now() WHERE id = $1 RETURNING id, name, address, created_at, updated_at",
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.address)
        .fetch_optional(&self.pool)
        .await?;
        match row {
            Some(row) => Ok(Some(self.load_complex(&row).await?)),
            None => Ok(None),
        }
    }

    async fn delete_by_id(&self, id: ComplexId) -> Result<Option<Complex>, DatabaseError> {
        // buildings go with the complex through ON DELETE CASCADE, so read them first
        let Some(complex) = ComplexStore::find_by_id(self, id).await? else {
            return Ok(None);
        };
        let deleted = sqlx::query("DELETE FROM complexes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok((deleted.rows_affected() > 0).then_some(complex))
    }

    async fn add_building(
        &self,
        complex_id: ComplexId,
        data: NewBuilding,
    ) -> Result<Option<Building>, DatabaseError> {
        let row = sqlx::query(
            "INSERT INTO buildings (id, complex_id, name, address) \
             SELECT $1, c.id, $3, $4 FROM complexes c WHERE c.id = $2 \
             RETURNING id, name, address",
        )
        .bind(BuildingId::generate())
        .bind(complex_id)
        .bind(&data.name)
        .bind(&data.address)
        .fetch_optional(&self.pool)
        .await?;

        if row.is_some() {
            sqlx::query("UPDATE complexes SET updated_at = now() WHERE id = $1")
                .bind(complex_id)
                .execute(&self.pool)
                .await?;
        }
        Ok(row.as_ref().map(building_from_row).transpose()?)
    }

    async fn remove_building(
        &self,
        complex_id: ComplexId,
        building_id: BuildingId,
    ) -> Result<Option<Building>, DatabaseError> {
        let row = sqlx::query(
            "DELETE FROM buildings WHERE id = $1 AND complex_id = $2 RETURNING id, name, address",
        )
        .bind(building_id)
        .bind(complex_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(building_from_row).transpose()?)
    }

    async fn upsert(&self, complex: Complex) -> Result<Complex, DatabaseError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO complexes (id, name, address, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, address = EXCLUDED.address, \
             updated_at = EXCLUDED.updated_at",
        )
        .bind(complex.id)
        .bind(&complex.name)
        .bind(&complex.address)
        .bind(complex.created_at)
        .bind(complex.updated_at)
        .execute(&mut *tx)
        .await?;

        let kept: Vec<uuid::Uuid> = complex.buildings.iter().map(|b| b.id.0).collect();
        sqlx::query("DELETE FROM buildings WHERE complex_id = $1 AND NOT (id = ANY($2))")
            .bind(complex.id)
            .bind(&kept)
            .execute(&mut *tx)
            .await?;

        for building in &complex.buildings {
            sqlx::query(
                "INSERT INTO buildings (id, complex_id, name, address) VALUES ($1, $2, $3, $4) \
                 ON CONFLICT (id) DO UPDATE SET complex_id = EXCLUDED.complex_id, \
                 name = EXCLUDED.name, address = EXCLUDED.address",
            )
            .bind(building.id)
            .bind(complex.id)
            .bind(&building.name)
            .bind(&building.address)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(complex)
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn create(&self, data: NewNotification) -> Result<Notification, DatabaseError> {
        let row = sqlx::query(&format!(
            "INSERT INTO notifications (id, complex_id, author_id, title, body) VALUES ($1, $2, $3, $4, $5) \
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(NotificationId::generate())
        .bind(data.complex_id)
        .bind(data.author_id)
        .bind(&data.title)
        .bind(&data.body)
        .fetch_one(&self.pool)
        .await?;
        Ok(notification_from_row(&row)?)
    }

    async fn find_by_id(&self, id: NotificationId) -> Result<Option<Notification>, DatabaseError> {
        let row = sqlx::query(&format!("SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(notification_from_row).transpose()?)
    }

    async fn list_by_complex(&self, complex_id: ComplexId) -> Result<Vec<Notification>, DatabaseError> {
        let rows = sqlx::query(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE complex_id = $1 ORDER BY created_at DESC"
        ))
        .bind(complex_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(notification_from_row).collect::<Result<_, _>>()?)
    }

    async fn delete_by_id(&self, id: NotificationId) -> Result<Option<Notification>, DatabaseError> {
        let row = sqlx::query(&format!(
            "DELETE FROM notifications WHERE id = $1 RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.as_ref().map(notification_from_row).transpose()?)
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, DatabaseError> {
        let row = sqlx::query("SELECT id, name, is_admin, buildings, created_at FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.as_ref().map(user_from_row).transpose()?)
    }

    async fn create(&self, data: NewUser) -> Result<User, DatabaseError> {
        let row = sqlx::query(
            "INSERT INTO users (id, name, is_admin, buildings) VALUES ($1, $2, $3, $4) \
             RETURNING id, name, is_admin, buildings, created_at",
        )
        .bind(UserId::generate())
        .bind(&data.name)
        .bind(data.is_admin)
        .bind(Json(&data.buildings))
        .fetch_one(&self.pool)
        .await?;
        Ok(user_from_row(&row)?)
    }

    async fn upsert(&self, user: User) -> Result<User, DatabaseError> {
        let row = sqlx::query(
            "INSERT INTO users (id, name, is_admin, buildings, created_at) VALUES ($1, $2, $3, $4, $5) \
             ON CONFLICT (id) DO UPDATE SET name = EXCLUDED.name, is_admin = EXCLUDED.is_admin, \
             buildings = EXCLUDED.buildings \
             RETURNING id, name, is_admin, buildings, created_at",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(user.is_admin)
        .bind(Json(&user.buildings))
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(user_from_row(&row)?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        DatabaseManager::health_check(&self.pool).await
    }
}
