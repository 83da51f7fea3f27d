//! Breast cancer classifier API
//!
//! A synchronous HTTP inference service around a pre-trained binary
//! classifier. A request carries 30 tissue measurements; the service
//! validates them, aligns them with the model's training columns, runs the
//! model and answers with a class, a label and class probabilities.
//!
//! # Modules
//!
//! - [`schema`] - request validation into a [`schema::FeatureRecord`]
//! - [`inference`] - feature alignment, the [`inference::Classifier`] seam
//!   and the [`inference::InferencePipeline`]
//! - [`server`] - axum router, handlers and HTTP error mapping
//! - [`logging`] - console and rotating-file diagnostics
//! - [`cli`] - command-line interface

pub mod error;

pub mod schema;
pub mod inference;

pub mod server;
pub mod logging;
pub mod cli;

pub use error::{ModelError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{ModelError, Result};
    pub use crate::schema::{validate, validate_json, FeatureRecord, FieldError, ValidationError};
    pub use crate::inference::{
        ClassLabel, Classifier, InferenceError, InferencePipeline, LogisticRegressionModel,
        ModelFeatureVector, PredictionResult,
    };
    pub use crate::server::{create_router, AppState, PredictError, ServerConfig};
}
