//! Feature field table and the validated record type

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Number of measurements in a record
pub const FEATURE_COUNT: usize = 30;

/// Wire names of every measurement, in training order
pub const FEATURE_FIELDS: [&str; FEATURE_COUNT] = [
    // mean
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    // standard error
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    // worst
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

/// Position of a wire field in [`FEATURE_FIELDS`]
pub fn field_index(name: &str) -> Option<usize> {
    FEATURE_FIELDS.iter().position(|field| *field == name)
}

/// A fully validated set of 30 finite measurements.
///
/// Values are stored in [`FEATURE_FIELDS`] order. The only way to build one
/// outside this module is through [`crate::schema::validate`] or
/// [`FeatureRecord::from_values`], both of which reject non-finite input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRecord {
    values: [f64; FEATURE_COUNT],
}

impl FeatureRecord {
    pub(crate) fn new_unchecked(values: [f64; FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Build a record from values in training order.
    ///
    /// Returns the wire names of the non-finite entries on failure.
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> std::result::Result<Self, Vec<&'static str>> {
        let bad: Vec<&'static str> = FEATURE_FIELDS
            .iter()
            .zip(values.iter())
            .filter(|(_, v)| !v.is_finite())
            .map(|(name, _)| *name)
            .collect();

        if bad.is_empty() {
            Ok(Self { values })
        } else {
            Err(bad)
        }
    }

    /// Value of a wire field, if the name is known
    pub fn get(&self, field: &str) -> Option<f64> {
        field_index(field).map(|idx| self.values[idx])
    }

    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Iterate `(wire name, value)` pairs in training order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_FIELDS.iter().copied().zip(self.values.iter().copied())
    }
}

impl Serialize for FeatureRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(FEATURE_COUNT))?;
        for (name, value) in self.iter() {
            map.serialize_entry(name, &value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_unique() {
        let unique: HashSet<&str> = FEATURE_FIELDS.iter().copied().collect();
        assert_eq!(unique.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_families_have_ten_metrics() {
        for suffix in ["_mean", "_se", "_worst"] {
            let count = FEATURE_FIELDS.iter().filter(|f| f.ends_with(suffix)).count();
            assert_eq!(count, 10, "suffix {}", suffix);
        }
    }

    #[test]
    fn test_get_by_name() {
        let mut values = [0.0; FEATURE_COUNT];
        values[7] = 0.05;
        let record = FeatureRecord::from_values(values).unwrap();
        assert_eq!(record.get("concave_points_mean"), Some(0.05));
        assert_eq!(record.get("concave points_mean"), None);
    }

    #[test]
    fn test_from_values_rejects_non_finite() {
        let mut values = [1.0; FEATURE_COUNT];
        values[0] = f64::NAN;
        values[29] = f64::INFINITY;
        let bad = FeatureRecord::from_values(values).unwrap_err();
        assert_eq!(bad, vec!["radius_mean", "fractal_dimension_worst"]);
    }

    #[test]
    fn test_serializes_as_ordered_object() {
        let record = FeatureRecord::from_values([2.5; FEATURE_COUNT]).unwrap();
        let json = serde_json::to_value(record).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), FEATURE_COUNT);
        assert_eq!(obj["area_worst"], serde_json::json!(2.5));
    }
}
