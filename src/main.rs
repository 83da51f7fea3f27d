//! Breast cancer classifier API - main entry point

use clap::Parser;
use tracing::info;

use breast_cancer_api::cli::{cmd_predict, cmd_serve, Cli, Commands};
use breast_cancer_api::logging::{init_logging, LogConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_writer = init_logging(&LogConfig::default())?;
    info!(log_file = %log_writer.path().display(), "Logging initialized");

    match cli.command {
        Some(Commands::Serve { port, host, model }) => {
            cmd_serve(host, port, model).await?;
        }
        Some(Commands::Predict { model, input }) => {
            cmd_predict(model.as_deref(), &input)?;
        }
        None => {
            cmd_serve(None, None, None).await?;
        }
    }

    Ok(())
}
