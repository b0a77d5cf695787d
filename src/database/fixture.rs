use anyhow::Context;
use serde::Deserialize;
use std::path::Path;
use tracing::info;

use crate::database::manager::DatabaseError;
use crate::database::models::{Complex, User};
use crate::database::store::{ComplexStore, Store, UserStore};

/// Users and complexes loaded into the store at startup. Ids are kept as
/// given, so applying the same fixture twice leaves one copy of each.
///
/// ```json
/// {
///   "users": [{ "id": "...", "name": "admin", "is_admin": true }],
///   "complexes": [{ "id": "...", "name": "...", "address": "...", "buildings": [],
///                   "created_at": "...", "updated_at": "..." }]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub complexes: Vec<Complex>,
}

impl Fixture {
    pub async fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("failed to read fixture {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("invalid fixture {}", path.display()))
    }

    pub async fn apply(self, store: &dyn Store) -> Result<(), DatabaseError> {
        info!(
            "Seeding {} store with {} users and {} complexes",
            store.backend_name(),
            self.users.len(),
            self.complexes.len()
        );
        for complex in self.complexes {
            ComplexStore::upsert(store, complex).await?;
        }
        for user in self.users {
            UserStore::upsert(store, user).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;
    use crate::types::{ComplexId, UserId};

    fn fixture(user_id: UserId, complex_id: ComplexId) -> Fixture {
        serde_json::from_value(serde_json::json!({
            "users": [{
                "id": user_id,
                "name": "moderator",
                "buildings": [{ "complex_id": complex_id, "moderator": true }]
            }],
            "complexes": [{
                "id": complex_id,
                "name": "Lakeside",
                "address": "9 Shore Rd",
                "created_at": "2024-03-01T10:00:00Z",
                "updated_at": "2024-03-01T10:00:00Z"
            }]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn seeds_users_and_complexes() {
        let user_id = UserId::generate();
        let complex_id = ComplexId::generate();

        let store = MemoryStore::new();
        fixture(user_id, complex_id).apply(&store).await.unwrap();

        let user = UserStore::find_by_id(&store, user_id).await.unwrap().unwrap();
        assert!(!user.is_admin);
        assert!(user.buildings[0].moderator);
        let complex = ComplexStore::find_by_id(&store, complex_id).await.unwrap().unwrap();
        assert!(complex.buildings.is_empty());
    }

    #[tokio::test]
    async fn applying_twice_keeps_one_copy() {
        let user_id = UserId::generate();
        let complex_id = ComplexId::generate();

        let store = MemoryStore::new();
        fixture(user_id, complex_id).apply(&store).await.unwrap();
        let mut renamed = fixture(user_id, complex_id);
        renamed.complexes[0].name = "Lakeside North".to_string();
        renamed.apply(&store).await.unwrap();

        let complexes = ComplexStore::list(&store).await.unwrap();
        assert_eq!(complexes.len(), 1);
        assert_eq!(complexes[0].id, complex_id);
        assert_eq!(complexes[0].name, "Lakeside North");
        assert!(UserStore::find_by_id(&store, user_id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        assert!(Fixture::from_path(Path::new("/nonexistent/fixture.json")).await.is_err());
    }
}
