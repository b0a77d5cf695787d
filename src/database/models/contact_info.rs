use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{BuildingId, ComplexId, ContactInfoId};

/// Free-form contact document (phones, emails, opening hours, ...)
pub type ContactFields = Map<String, Value>;

/// Keys owned by the store; a payload may never set them
pub const SYSTEM_FIELDS: &[&str] = &["id", "complex_id", "building_id", "created_at", "updated_at"];

/// First system field present in `fields`, if any
pub fn find_system_field(fields: &ContactFields) -> Option<&'static str> {
    SYSTEM_FIELDS
        .iter()
        .copied()
        .find(|field| fields.contains_key(*field))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactInfoRecord {
    pub id: ContactInfoId,
    pub complex_id: ComplexId,
    /// Absent for complex-level contact info
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_id: Option<BuildingId>,
    #[serde(flatten)]
    pub fields: ContactFields,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewContactInfo {
    pub complex_id: ComplexId,
    pub building_id: Option<BuildingId>,
    pub fields: ContactFields,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn complex_level_record_has_no_building_key() {
        let mut fields = ContactFields::new();
        fields.insert("phone".into(), json!("+380441234567"));
        let record = ContactInfoRecord {
            id: ContactInfoId::generate(),
            complex_id: ComplexId::generate(),
            building_id: None,
            fields,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let v = serde_json::to_value(&record).unwrap();
        assert!(v.get("building_id").is_none());
        assert_eq!(v["phone"], "+380441234567");
        assert_eq!(v["complex_id"], record.complex_id.to_string());
    }

    #[test]
    fn detects_system_fields() {
        let fields: ContactFields = serde_json::from_value(json!({"email": "a@b.c", "complex_id": "x"})).unwrap();
        assert_eq!(find_system_field(&fields), Some("complex_id"));

        let fields: ContactFields = serde_json::from_value(json!({"email": "a@b.c"})).unwrap();
        assert_eq!(find_system_field(&fields), None);
    }
}
