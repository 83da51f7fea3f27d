//! Application state management

use std::sync::Arc;

use uuid::Uuid;

use crate::error::Result;
use crate::inference::{Classifier, InferencePipeline, LogisticRegressionModel};

use super::ServerConfig;

/// Application state shared across handlers.
///
/// Built once at startup; nothing in here changes afterwards.
pub struct AppState {
    pub config: ServerConfig,
    pub pipeline: InferencePipeline,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// State around an already-loaded classifier
    pub fn new(config: ServerConfig, model: Arc<dyn Classifier>) -> Self {
        Self {
            config,
            pipeline: InferencePipeline::new(model),
            started_at: chrono::Utc::now(),
        }
    }

    /// Load the model artifact named by the configuration
    pub fn from_config(config: ServerConfig) -> Result<Self> {
        let model = LogisticRegressionModel::load(&config.model_path)?;
        Ok(Self::new(config, Arc::new(model)))
    }

    /// Short id used to correlate the log lines of one request
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()[..8].to_string()
    }
}
