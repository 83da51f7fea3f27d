//! Request schema for tissue-sample feature records
//!
//! The wire format is a flat JSON object with 30 numeric measurements:
//! ten morphological metrics, each reported as a `mean`, a standard error
//! (`se`) and a `worst` value. [`validate`] turns an untyped body into a
//! [`FeatureRecord`] or a [`ValidationError`] listing every bad field.

mod fields;
mod validator;

pub use fields::{field_index, FeatureRecord, FEATURE_COUNT, FEATURE_FIELDS};
pub use validator::{validate, validate_json, FieldError, ValidationError};
