//! HTTP server for the breast cancer classifier
//!
//! Two routes: `GET /` reports liveness and `POST /predict` classifies one
//! tissue sample. The model is loaded once before the listener binds and
//! is shared read-only by every request.

mod api;
mod error;
mod handlers;
mod state;

pub use api::create_router;
pub use error::{PredictError, INTERNAL_MESSAGE, VALIDATION_MESSAGE};
pub use handlers::HEALTH_MESSAGE;
pub use state::AppState;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub model_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8001),
            model_path: std::env::var("MODEL_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("models/breast_cancer_model.json")),
        }
    }
}

/// Start the server with the given configuration
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let start_time = chrono::Utc::now();
    info!(
        model_path = %config.model_path.display(),
        started_at = %start_time.to_rfc3339(),
        "Loading model"
    );

    let state = AppState::from_config(config.clone())
        .with_context(|| format!("failed to load model from {}", config.model_path.display()))?;
    info!(
        n_features = state.pipeline.model().feature_names().len(),
        "Model loaded"
    );

    let app = create_router(Arc::new(state));

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.host, config.port))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, pid = std::process::id(), "Server listening and ready to accept connections");

    let shutdown_signal = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install ctrl+c handler, graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
        let uptime = chrono::Utc::now().signed_duration_since(start_time);
        info!(
            uptime_secs = uptime.num_seconds(),
            "Shutdown signal received, stopping server gracefully"
        );
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("Server shut down cleanly");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        if std::env::var("API_PORT").is_err() {
            assert_eq!(config.port, 8001);
        }
        if std::env::var("MODEL_PATH").is_err() {
            assert_eq!(config.model_path, PathBuf::from("models/breast_cancer_model.json"));
        }
    }
}
