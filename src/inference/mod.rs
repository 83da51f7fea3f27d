//! Inference module
//!
//! Turns a validated [`FeatureRecord`](crate::schema::FeatureRecord) into a
//! [`PredictionResult`]:
//! - [`alignment`] renames wire fields to the model's training columns
//! - [`model`] defines the [`Classifier`] seam and the shipped artifact type
//! - [`InferencePipeline`] invokes the model and shapes the response

pub mod alignment;
pub mod model;
mod engine;

pub use alignment::{model_column_name, ModelFeatureVector, MODEL_COLUMN_RENAMES};
pub use engine::{ClassLabel, InferenceError, InferencePipeline, PredictionResult};
pub use model::{
    Classifier, LogisticRegressionArtifact, LogisticRegressionModel, StandardScalerParams,
    MODEL_FORMAT_VERSION,
};
