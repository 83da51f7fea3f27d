//! HTTP request handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::{info, info_span};

use crate::inference::{InferencePipeline, PredictionResult};
use crate::schema;

use super::error::PredictError;
use super::state::AppState;

/// Body of the liveness response
pub const HEALTH_MESSAGE: &str = "Breast cancer model API is running.";

/// Liveness check
pub async fn home() -> Json<Value> {
    info!("GET / - API is up");
    Json(json!({ "message": HEALTH_MESSAGE }))
}

/// Classify one tissue sample.
///
/// The body is read as raw bytes and decoded here, so a missing or wrong
/// `Content-Type` header does not change the outcome.
pub async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let span = info_span!("predict", request_id = %AppState::generate_id());
    span.in_scope(|| {
        info!(
            payload = %String::from_utf8_lossy(&body),
            "POST /predict - payload received"
        );

        match run_prediction(&state.pipeline, &body) {
            Ok(result) => {
                info!(
                    prediction = result.class_index,
                    prediction_label = %result.label,
                    probability = ?result.probabilities,
                    "POST /predict - response sent"
                );
                Json(result).into_response()
            }
            Err(err) => err.into_response(),
        }
    })
}

fn run_prediction(pipeline: &InferencePipeline, body: &[u8]) -> Result<PredictionResult, PredictError> {
    let record = schema::validate_json(body)?;
    Ok(pipeline.infer(&record)?)
}
