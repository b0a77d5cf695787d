/// Shared identifier types used across the codebase
///
/// Every entity id is a UUID wrapped in its own newtype so a building id can
/// never be passed where a complex id is expected. Comparison is by value.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            Serialize, Deserialize, sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Fresh random identifier
            pub fn generate() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map(Self)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }
    };
}

id_type!(
    /// Residential complex identifier
    ComplexId
);
id_type!(
    /// Building identifier, unique within the whole system
    BuildingId
);
id_type!(ContactInfoId);
id_type!(NotificationId);
id_type!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_canonical_and_padded_forms() {
        let raw = "5b0f7c64-6f1e-4c1a-9d63-0e7f3f4b2a11";
        let a: ComplexId = raw.parse().unwrap();
        let b: ComplexId = format!("  {}  ", raw.to_uppercase()).parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), raw);
    }

    #[test]
    fn rejects_malformed_ids() {
        assert!("not-a-uuid".parse::<BuildingId>().is_err());
        assert!("".parse::<UserId>().is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = NotificationId::generate();
        let v = serde_json::to_value(id).unwrap();
        assert_eq!(v, serde_json::Value::String(id.to_string()));
    }
}
