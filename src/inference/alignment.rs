//! Wire-to-model feature alignment
//!
//! The classifier was fitted on a table whose "concave points" columns
//! contain a literal space. The wire format uses an underscore instead, so
//! those three columns are renamed; every other column keeps its name and
//! position.

use ndarray::{Array2, ArrayView1};

use crate::schema::{FeatureRecord, FEATURE_COUNT, FEATURE_FIELDS};

/// Wire name → model column name, for the only columns that differ
pub const MODEL_COLUMN_RENAMES: [(&str, &str); 3] = [
    ("concave_points_mean", "concave points_mean"),
    ("concave_points_se", "concave points_se"),
    ("concave_points_worst", "concave points_worst"),
];

/// Model column name for a wire field
pub fn model_column_name(wire: &str) -> &str {
    MODEL_COLUMN_RENAMES
        .iter()
        .find(|(from, _)| *from == wire)
        .map(|(_, to)| *to)
        .unwrap_or(wire)
}

/// Column names in the order the model was trained on
pub fn model_columns() -> [&'static str; FEATURE_COUNT] {
    let mut columns = FEATURE_FIELDS;
    for column in columns.iter_mut() {
        *column = model_column_name(*column);
    }
    columns
}

/// A single row laid out exactly as the classifier expects it
#[derive(Debug, Clone, PartialEq)]
pub struct ModelFeatureVector {
    columns: [&'static str; FEATURE_COUNT],
    values: Array2<f64>,
}

impl ModelFeatureVector {
    /// Rename and reshape a validated record into a `1 × 30` row
    pub fn align(record: &FeatureRecord) -> Self {
        let values = Array2::from_shape_fn((1, FEATURE_COUNT), |(_, j)| record.values()[j]);
        Self {
            columns: model_columns(),
            values,
        }
    }

    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    /// Feature matrix with shape `(1, n_features)`
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn row(&self) -> ArrayView1<'_, f64> {
        self.values.row(0)
    }

    pub fn get(&self, column: &str) -> Option<f64> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .map(|j| self.values[[0, j]])
    }
}
