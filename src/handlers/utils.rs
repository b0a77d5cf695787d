use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ApiError;

/// Parse a path identifier, answering 400 for anything that is not a UUID
pub fn parse_id<T: FromStr>(raw: &str, what: &str) -> Result<T, ApiError> {
    raw.parse()
        .map_err(|_| ApiError::bad_request(format!("Invalid {} id: '{}'", what, raw)))
}

/// Collects per-field messages for request body validation
#[derive(Debug, Default)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(&mut self, field: &str, value: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.0.insert(field.to_string(), "This field must not be empty".to_string());
        }
        self
    }

    pub fn require_opt(&mut self, field: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) => self.require(field, value),
            None => self,
        }
    }

    pub fn into_result(self) -> Result<(), ApiError> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ApiError::validation_error("Invalid request body", Some(self.0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComplexId;
    use axum::http::StatusCode;

    #[test]
    fn malformed_id_is_bad_request() {
        let err = parse_id::<ComplexId>("not-an-id", "complex").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.message(), "Invalid complex id: 'not-an-id'");
    }

    #[test]
    fn field_errors_name_each_blank_field() {
        let mut errors = FieldErrors::new();
        errors.require("name", "  ").require("address", "1 Main St").require_opt("title", Some(""));
        let body = errors.into_result().unwrap_err().to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["field_errors"].get("name").is_some());
        assert!(body["field_errors"].get("title").is_some());
        assert!(body["field_errors"].get("address").is_none());
    }
}
