//! Trained classifier interface and the logistic regression artifact
//!
//! The service treats the estimator as a black box: it exposes a class
//! prediction and a probability estimate over a named, ordered feature
//! row. [`LogisticRegressionModel`] is the artifact produced by the
//! training pipeline (a standard scaler followed by a logistic regression),
//! serialized as JSON.

use std::path::Path;

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};
use super::alignment::ModelFeatureVector;

/// Artifact format understood by this build
pub const MODEL_FORMAT_VERSION: u32 = 1;

/// A binary classifier that can be shared between request handlers.
///
/// Implementations must be safe for concurrent read-only use; the server
/// holds a single instance behind an `Arc` for the whole process lifetime.
pub trait Classifier: Send + Sync {
    /// Column names the estimator was fitted on, in order
    fn feature_names(&self) -> &[String];

    /// Predicted class index for each row
    fn predict(&self, x: &ModelFeatureVector) -> Result<Array1<usize>>;

    /// Class probabilities for each row, shape `(n_rows, 2)`
    fn predict_proba(&self, x: &ModelFeatureVector) -> Result<Array2<f64>>;
}

/// Per-feature standardization fitted alongside the estimator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk layout of a logistic regression artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegressionArtifact {
    pub format_version: u32,
    pub estimator: String,
    pub feature_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<StandardScalerParams>,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    0.5
}

/// A fitted logistic regression with optional input standardization
#[derive(Debug, Clone)]
pub struct LogisticRegressionModel {
    feature_names: Vec<String>,
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
    coefficients: Array1<f64>,
    intercept: f64,
    threshold: f64,
}

impl LogisticRegressionModel {
    /// Load and validate an artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let artifact: LogisticRegressionArtifact = serde_json::from_str(&json)?;
        Self::from_artifact(artifact)
    }

    /// Build a model from an in-memory artifact
    pub fn from_artifact(artifact: LogisticRegressionArtifact) -> Result<Self> {
        if artifact.format_version != MODEL_FORMAT_VERSION {
            return Err(ModelError::UnsupportedArtifact(format!(
                "format_version {} (expected {})",
                artifact.format_version, MODEL_FORMAT_VERSION
            )));
        }
        if artifact.estimator != "logistic_regression" {
            return Err(ModelError::UnsupportedArtifact(format!(
                "estimator '{}'",
                artifact.estimator
            )));
        }

        let n_features = artifact.feature_names.len();
        if n_features == 0 {
            return Err(ModelError::ShapeError {
                expected: "at least one feature".to_string(),
                actual: "0 features".to_string(),
            });
        }
        check_len("coefficients", &artifact.coefficients, n_features)?;
        check_finite("coefficients", &artifact.coefficients)?;
        check_finite("intercept", &[artifact.intercept])?;

        if !(artifact.threshold > 0.0 && artifact.threshold < 1.0) {
            return Err(ModelError::InvalidParameter {
                name: "threshold".to_string(),
                value: artifact.threshold.to_string(),
                reason: "must lie strictly between 0 and 1".to_string(),
            });
        }

        let (mean, scale) = match artifact.scaler {
            Some(scaler) => {
                check_len("scaler.mean", &scaler.mean, n_features)?;
                check_len("scaler.scale", &scaler.scale, n_features)?;
                check_finite("scaler.mean", &scaler.mean)?;
                check_finite("scaler.scale", &scaler.scale)?;
                if let Some(idx) = scaler.scale.iter().position(|s| *s == 0.0) {
                    return Err(ModelError::InvalidParameter {
                        name: format!("scaler.scale[{}]", idx),
                        value: "0".to_string(),
                        reason: "scale must be non-zero".to_string(),
                    });
                }
                (Some(Array1::from(scaler.mean)), Some(Array1::from(scaler.scale)))
            }
            None => (None, None),
        };

        Ok(Self {
            feature_names: artifact.feature_names,
            mean,
            scale,
            coefficients: Array1::from(artifact.coefficients),
            intercept: artifact.intercept,
            threshold: artifact.threshold,
        })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn sigmoid(z: &Array1<f64>) -> Array1<f64> {
        z.mapv(|v| 1.0 / (1.0 + (-v).exp()))
    }

    /// Refuse rows whose columns differ from the fitted ones
    fn check_columns(&self, x: &ModelFeatureVector) -> Result<()> {
        let columns = x.columns();
        if columns.len() != self.feature_names.len() {
            return Err(ModelError::ShapeError {
                expected: format!("{} features", self.feature_names.len()),
                actual: format!("{} features", columns.len()),
            });
        }

        let unexpected: Vec<&str> = columns
            .iter()
            .zip(self.feature_names.iter())
            .filter(|(got, want)| **got != want.as_str())
            .map(|(got, _)| *got)
            .collect();
        if !unexpected.is_empty() {
            return Err(ModelError::FeatureMismatch(unexpected.join(", ")));
        }
        Ok(())
    }

    /// Probability of class 1 for each row
    fn positive_proba(&self, x: &ModelFeatureVector) -> Result<Array1<f64>> {
        self.check_columns(x)?;

        let mut features = x.values().to_owned();
        if let (Some(mean), Some(scale)) = (&self.mean, &self.scale) {
            for mut row in features.rows_mut() {
                row -= mean;
                row /= scale;
            }
        }

        let linear = features.dot(&self.coefficients) + self.intercept;
        let proba = Self::sigmoid(&linear);
        if proba.iter().any(|p| !p.is_finite()) {
            return Err(ModelError::ComputationError(
                "non-finite probability".to_string(),
            ));
        }
        Ok(proba)
    }
}

impl Classifier for LogisticRegressionModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, x: &ModelFeatureVector) -> Result<Array1<usize>> {
        let proba = self.positive_proba(x)?;
        Ok(proba.mapv(|p| if p >= self.threshold { 1 } else { 0 }))
    }

    fn predict_proba(&self, x: &ModelFeatureVector) -> Result<Array2<f64>> {
        let proba = self.positive_proba(x)?;
        let n_rows = proba.len();
        let mut out = Array2::zeros((n_rows, 2));
        for (i, p) in proba.iter().enumerate() {
            out[[i, 0]] = 1.0 - p;
            out[[i, 1]] = *p;
        }
        Ok(out)
    }
}

fn check_len(name: &str, values: &[f64], expected: usize) -> Result<()> {
    if values.len() != expected {
        return Err(ModelError::ShapeError {
            expected: format!("{} length = {}", name, expected),
            actual: format!("{} length = {}", name, values.len()),
        });
    }
    Ok(())
}

fn check_finite(name: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(idx) => Err(ModelError::InvalidParameter {
            name: format!("{}[{}]", name, idx),
            value: values[idx].to_string(),
            reason: "must be finite".to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::alignment::model_columns;
    use crate::schema::{FeatureRecord, FEATURE_COUNT};
    use std::io::Write;

    /// Model that only looks at `radius_mean` (column 0)
    fn radius_artifact() -> LogisticRegressionArtifact {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 1.0;
        LogisticRegressionArtifact {
            format_version: MODEL_FORMAT_VERSION,
            estimator: "logistic_regression".to_string(),
            feature_names: model_columns().iter().map(|c| c.to_string()).collect(),
            scaler: Some(StandardScalerParams {
                mean: vec![14.0; FEATURE_COUNT],
                scale: vec![2.0; FEATURE_COUNT],
            }),
            coefficients,
            intercept: 0.0,
            threshold: 0.5,
        }
    }

    fn row_with_radius(radius: f64) -> ModelFeatureVector {
        let mut values = [1.0; FEATURE_COUNT];
        values[0] = radius;
        ModelFeatureVector::align(&FeatureRecord::from_values(values).unwrap())
    }

    #[test]
    fn test_proba_at_mean_is_half() {
        let model = LogisticRegressionModel::from_artifact(radius_artifact()).unwrap();
        let proba = model.predict_proba(&row_with_radius(14.0)).unwrap();
        assert_eq!(proba.dim(), (1, 2));
        assert!((proba[[0, 0]] - 0.5).abs() < 1e-12);
        assert!((proba[[0, 1]] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_predict_matches_proba() {
        let model = LogisticRegressionModel::from_artifact(radius_artifact()).unwrap();

        let high = row_with_radius(20.0);
        let expected = 1.0 / (1.0 + (-3.0f64).exp());
        let proba = model.predict_proba(&high).unwrap();
        assert!((proba[[0, 1]] - expected).abs() < 1e-12);
        assert_eq!(model.predict(&high).unwrap()[0], 1);

        let low = row_with_radius(8.0);
        assert_eq!(model.predict(&low).unwrap()[0], 0);
        let proba = model.predict_proba(&low).unwrap();
        assert!((proba[[0, 0]] + proba[[0, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wire_column_names() {
        let mut artifact = radius_artifact();
        artifact.feature_names[7] = "concave_points_mean".to_string();
        let model = LogisticRegressionModel::from_artifact(artifact).unwrap();

        let err = model.predict(&row_with_radius(14.0)).unwrap_err();
        match err {
            ModelError::FeatureMismatch(cols) => assert_eq!(cols, "concave points_mean"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_wrong_feature_count() {
        let mut artifact = radius_artifact();
        artifact.feature_names.pop();
        artifact.coefficients.pop();
        artifact.scaler = None;
        let model = LogisticRegressionModel::from_artifact(artifact).unwrap();

        let err = model.predict_proba(&row_with_radius(14.0)).unwrap_err();
        assert!(matches!(err, ModelError::ShapeError { .. }));
    }

    #[test]
    fn test_rejects_inconsistent_artifact() {
        let mut artifact = radius_artifact();
        artifact.coefficients.push(0.0);
        let err = LogisticRegressionModel::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, ModelError::ShapeError { .. }));

        let mut artifact = radius_artifact();
        if let Some(scaler) = artifact.scaler.as_mut() {
            scaler.scale[3] = 0.0;
        }
        let err = LogisticRegressionModel::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, ModelError::InvalidParameter { .. }));

        let mut artifact = radius_artifact();
        artifact.threshold = 1.0;
        assert!(LogisticRegressionModel::from_artifact(artifact).is_err());

        let mut artifact = radius_artifact();
        artifact.estimator = "random_forest".to_string();
        let err = LogisticRegressionModel::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, ModelError::UnsupportedArtifact(_)));
    }

    #[test]
    fn test_load_from_file() {
        let json = serde_json::to_string_pretty(&radius_artifact()).unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();

        let model = LogisticRegressionModel::load(file.path()).unwrap();
        assert_eq!(model.feature_names().len(), FEATURE_COUNT);
        assert_eq!(model.feature_names()[7], "concave points_mean");
        assert_eq!(model.threshold(), 0.5);
    }

    #[test]
    fn test_load_missing_file() {
        let err = LogisticRegressionModel::load("/nonexistent/model.json").unwrap_err();
        assert!(matches!(err, ModelError::IoError(_)));
    }

    #[test]
    fn test_threshold_defaults_when_absent() {
        let mut value = serde_json::to_value(radius_artifact()).unwrap();
        value.as_object_mut().unwrap().remove("threshold");
        let artifact: LogisticRegressionArtifact = serde_json::from_value(value).unwrap();
        assert_eq!(artifact.threshold, 0.5);
    }
}
