//! Error types for the server

use std::error::Error as StdError;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::{error, warn};

use crate::inference::InferenceError;
use crate::schema::ValidationError;

/// Body message for 400 responses
pub const VALIDATION_MESSAGE: &str = "Invalid input data";

/// Body message for 500 responses
pub const INTERNAL_MESSAGE: &str = "Internal server error";

/// Everything `/predict` can fail with
#[derive(Error, Debug)]
pub enum PredictError {
    /// The client sent a body that does not match the schema
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The request was valid but the model could not answer it
    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl PredictError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            PredictError::Validation(_) => StatusCode::BAD_REQUEST,
            PredictError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// `outer: inner: innermost`
fn error_chain(err: &dyn StdError) -> String {
    let mut chain = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str(": ");
        chain.push_str(&cause.to_string());
        source = cause.source();
    }
    chain
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = match self {
            PredictError::Validation(err) => {
                warn!(error = %err, "POST /predict - validation failed");
                json!({
                    "error": VALIDATION_MESSAGE,
                    "details": err.field_errors,
                })
            }
            PredictError::Inference(err) => {
                error!(
                    error = %error_chain(&err),
                    detail = ?err,
                    "POST /predict - unexpected error"
                );
                json!({ "error": INTERNAL_MESSAGE })
            }
        };

        (status, Json(body)).into_response()
    }
}
