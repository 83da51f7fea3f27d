//! Typed decoding of untyped request bodies

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::fields::{FeatureRecord, FEATURE_COUNT, FEATURE_FIELDS};

/// Pseudo-field used when the body itself cannot be decoded
const BODY_FIELD: &str = "body";

/// A single offending field and why it was rejected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    pub fn missing(field: &str) -> Self {
        Self {
            field: field.to_string(),
            reason: "field required".to_string(),
        }
    }

    pub fn invalid(field: &str, value: &Value) -> Self {
        Self {
            field: field.to_string(),
            reason: format!("expected a finite number, got {}", json_type(value)),
        }
    }

    fn malformed_body(reason: impl Into<String>) -> Self {
        Self {
            field: BODY_FIELD.to_string(),
            reason: reason.into(),
        }
    }
}

/// Client input that does not satisfy the record schema
#[derive(Error, Debug, Clone, PartialEq)]
#[error("invalid input data: {}", summarize(.field_errors))]
pub struct ValidationError {
    pub field_errors: Vec<FieldError>,
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.field, e.reason))
        .collect::<Vec<_>>()
        .join(", ")
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "non-finite number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Validate a parsed JSON body.
///
/// Every required field is checked; the error lists all offenders in
/// training order. Unknown keys are ignored.
pub fn validate(body: &Value) -> Result<FeatureRecord, ValidationError> {
    let obj = body.as_object().ok_or_else(|| ValidationError {
        field_errors: vec![FieldError::malformed_body(format!(
            "expected a JSON object, got {}",
            json_type(body)
        ))],
    })?;

    let mut values = [0.0; FEATURE_COUNT];
    let mut field_errors = Vec::new();

    for (slot, field) in values.iter_mut().zip(FEATURE_FIELDS.iter()) {
        match obj.get(*field) {
            None => field_errors.push(FieldError::missing(field)),
            Some(value) => match value.as_f64().filter(|v| v.is_finite()) {
                Some(v) => *slot = v,
                None => field_errors.push(FieldError::invalid(field, value)),
            },
        }
    }

    if field_errors.is_empty() {
        Ok(FeatureRecord::new_unchecked(values))
    } else {
        Err(ValidationError { field_errors })
    }
}

/// Parse raw bytes as JSON and validate them
pub fn validate_json(bytes: &[u8]) -> Result<FeatureRecord, ValidationError> {
    let body: Value = serde_json::from_slice(bytes).map_err(|e| ValidationError {
        field_errors: vec![FieldError::malformed_body(format!("invalid JSON: {}", e))],
    })?;
    validate(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_body() -> Value {
        let mut map = serde_json::Map::new();
        for (i, field) in FEATURE_FIELDS.iter().enumerate() {
            map.insert(field.to_string(), json!(i as f64 + 0.5));
        }
        Value::Object(map)
    }

    #[test]
    fn test_valid_body() {
        let record = validate(&full_body()).unwrap();
        assert_eq!(record.get("radius_mean"), Some(0.5));
        assert_eq!(record.get("fractal_dimension_worst"), Some(29.5));
    }

    #[test]
    fn test_integers_are_accepted() {
        let mut body = full_body();
        body["area_mean"] = json!(600);
        let record = validate(&body).unwrap();
        assert_eq!(record.get("area_mean"), Some(600.0));
    }

    #[test]
    fn test_extra_keys_ignored() {
        let mut body = full_body();
        body["patient_id"] = json!("abc-123");
        body["concave points_mean"] = json!(1.0);
        assert!(validate(&body).is_ok());
    }

    #[test]
    fn test_missing_field() {
        let mut body = full_body();
        body.as_object_mut().unwrap().remove("texture_mean");

        let err = validate(&body).unwrap_err();
        assert_eq!(err.field_errors, vec![FieldError::missing("texture_mean")]);
    }

    #[test]
    fn test_reports_every_offender_in_order() {
        let mut body = full_body();
        let obj = body.as_object_mut().unwrap();
        obj.remove("symmetry_worst");
        obj.insert("radius_mean".to_string(), json!("no_es_numero"));
        obj.insert("area_se".to_string(), json!(null));
        obj.insert("smoothness_mean".to_string(), json!(true));

        let err = validate(&body).unwrap_err();
        let fields: Vec<&str> = err.field_errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["radius_mean", "smoothness_mean", "area_se", "symmetry_worst"]);
        assert_eq!(err.field_errors[0].reason, "expected a finite number, got string");
        assert_eq!(err.field_errors[1].reason, "expected a finite number, got boolean");
        assert_eq!(err.field_errors[2].reason, "expected a finite number, got null");
        assert_eq!(err.field_errors[3].reason, "field required");
    }

    #[test]
    fn test_numeric_strings_rejected() {
        let mut body = full_body();
        body["radius_mean"] = json!("14.0");
        let err = validate(&body).unwrap_err();
        assert_eq!(err.field_errors.len(), 1);
        assert_eq!(err.field_errors[0].field, "radius_mean");
    }

    #[test]
    fn test_empty_object_lists_all_fields() {
        let err = validate(&json!({})).unwrap_err();
        assert_eq!(err.field_errors.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_non_object_body() {
        let err = validate(&json!([1.0, 2.0])).unwrap_err();
        assert_eq!(err.field_errors.len(), 1);
        assert_eq!(err.field_errors[0].field, "body");
        assert_eq!(err.field_errors[0].reason, "expected a JSON object, got array");
    }

    #[test]
    fn test_malformed_json() {
        let err = validate_json(b"{\"radius_mean\": ").unwrap_err();
        assert_eq!(err.field_errors.len(), 1);
        assert_eq!(err.field_errors[0].field, "body");
        assert!(err.field_errors[0].reason.starts_with("invalid JSON"));
    }

    #[test]
    fn test_display_lists_fields() {
        let err = ValidationError {
            field_errors: vec![FieldError::missing("texture_mean"), FieldError::missing("area_mean")],
        };
        assert_eq!(
            err.to_string(),
            "invalid input data: texture_mean (field required), area_mean (field required)"
        );
    }
}
