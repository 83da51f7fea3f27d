//! Inference pipeline implementation
//!
//! One validated record in, one response out:
//! - align the record with the model's training columns
//! - ask the model for a class and for class probabilities
//! - map the class through the fixed label table
//!
//! The pipeline holds no per-request state. The classifier handle is shared
//! and read-only, so a single pipeline serves every request concurrently.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::ModelError;
use crate::schema::FeatureRecord;
use super::alignment::ModelFeatureVector;
use super::model::Classifier;

/// Human-readable diagnosis for each class index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ClassLabel {
    Benign,
    Malignant,
}

impl ClassLabel {
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(ClassLabel::Benign),
            1 => Some(ClassLabel::Malignant),
            _ => None,
        }
    }

    pub fn index(self) -> usize {
        match self {
            ClassLabel::Benign => 0,
            ClassLabel::Malignant => 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ClassLabel::Benign => "Benign",
            ClassLabel::Malignant => "Malignant",
        }
    }
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single prediction, serialized as the `/predict` response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    #[serde(rename = "prediction")]
    pub class_index: usize,
    #[serde(rename = "prediction_label")]
    pub label: ClassLabel,
    /// `[p(class = 0), p(class = 1)]` as reported by the model
    #[serde(rename = "probability")]
    pub probabilities: [f64; 2],
}

/// Any failure after the request passed validation
#[derive(Error, Debug)]
pub enum InferenceError {
    #[error("model invocation failed")]
    Model(#[from] ModelError),

    #[error("unexpected {output} shape: expected {expected}, got {actual}")]
    OutputShape {
        output: &'static str,
        expected: String,
        actual: String,
    },

    #[error("model returned unknown class index {0}")]
    UnknownClass(usize),

    #[error("model returned invalid probability {0}")]
    InvalidProbability(f64),
}

/// Validated record → model → response
#[derive(Clone)]
pub struct InferencePipeline {
    model: Arc<dyn Classifier>,
}

impl fmt::Debug for InferencePipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferencePipeline")
            .field("n_features", &self.model.feature_names().len())
            .finish()
    }
}

impl InferencePipeline {
    pub fn new(model: Arc<dyn Classifier>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &dyn Classifier {
        self.model.as_ref()
    }

    /// Run one record through the model.
    ///
    /// The class and the probabilities come from two separate model calls on
    /// the same row. They are returned as reported; the class is never
    /// re-derived from the probabilities.
    pub fn infer(&self, record: &FeatureRecord) -> Result<PredictionResult, InferenceError> {
        let start = Instant::now();
        let x = ModelFeatureVector::align(record);

        let classes = self.model.predict(&x)?;
        let proba = self.model.predict_proba(&x)?;

        if classes.len() != 1 {
            return Err(InferenceError::OutputShape {
                output: "class",
                expected: "1 prediction".to_string(),
                actual: format!("{} predictions", classes.len()),
            });
        }
        if proba.dim() != (1, 2) {
            return Err(InferenceError::OutputShape {
                output: "probability",
                expected: "(1, 2)".to_string(),
                actual: format!("{:?}", proba.dim()),
            });
        }

        let class_index = classes[0];
        let label = ClassLabel::from_index(class_index)
            .ok_or(InferenceError::UnknownClass(class_index))?;

        let probabilities = [proba[[0, 0]], proba[[0, 1]]];
        if let Some(p) = probabilities
            .iter()
            .find(|p| !p.is_finite() || **p < 0.0 || **p > 1.0)
        {
            return Err(InferenceError::InvalidProbability(*p));
        }

        let most_likely = if probabilities[1] > probabilities[0] { 1 } else { 0 };
        if most_likely != class_index && probabilities[0] != probabilities[1] {
            warn!(
                class_index,
                p0 = probabilities[0],
                p1 = probabilities[1],
                "Model class prediction disagrees with its probability estimate"
            );
        }

        debug!(
            class_index,
            latency_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Inference completed"
        );

        Ok(PredictionResult {
            class_index,
            label,
            probabilities,
        })
    }
}
