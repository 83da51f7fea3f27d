//! Command-line interface: run the server or classify a record offline

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use colored::*;

use crate::inference::{ClassLabel, InferencePipeline, LogisticRegressionModel};
use crate::schema;
use crate::server::{run_server, ServerConfig};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }
fn bad(s: &str) -> ColoredString   { s.truecolor(235, 110, 100) }

fn kv(key: &str, val: &str) -> String {
    format!("{} {}", muted(key), val.white())
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "breast-cancer-api")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "HTTP inference service for a breast cancer classifier")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server
    Serve {
        /// Server port
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host
        #[arg(long)]
        host: Option<String>,

        /// Model artifact (JSON)
        #[arg(short, long)]
        model: Option<PathBuf>,
    },

    /// Classify a single record from a JSON file
    Predict {
        /// Model artifact (JSON)
        #[arg(short, long)]
        model: Option<PathBuf>,

        /// JSON object with the 30 measurements
        #[arg(short, long)]
        input: PathBuf,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    model: Option<PathBuf>,
) -> anyhow::Result<()> {
    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        model_path: model.unwrap_or(defaults.model_path),
    };

    section(&format!("Breast Cancer API v{}", env!("CARGO_PKG_VERSION")));
    println!("  {}", kv("Model  ", &config.model_path.display().to_string()));
    println!("  {}", kv("Health ", &format!("http://{}:{}/", config.host, config.port)));
    println!("  {}", kv("Predict", &format!("http://{}:{}/predict", config.host, config.port)));
    println!("  {}", dim("ctrl+c to stop"));
    println!();

    run_server(config).await
}

pub fn cmd_predict(model: Option<&Path>, input: &Path) -> anyhow::Result<()> {
    let model_path = model
        .map(Path::to_path_buf)
        .unwrap_or_else(|| ServerConfig::default().model_path);

    section("Predict");

    let classifier = LogisticRegressionModel::load(&model_path)
        .with_context(|| format!("failed to load model from {}", model_path.display()))?;
    let pipeline = InferencePipeline::new(Arc::new(classifier));

    let body = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;

    let record = match schema::validate_json(&body) {
        Ok(record) => record,
        Err(err) => {
            println!("  {} {}", bad("✗"), "Invalid input data".white());
            for detail in &err.field_errors {
                println!("    {} {}", muted(&detail.field), dim(&detail.reason));
            }
            println!();
            anyhow::bail!("{} invalid field(s)", err.field_errors.len());
        }
    };

    let result = pipeline.infer(&record)?;
    let label = match result.label {
        ClassLabel::Benign => ok(result.label.as_str()),
        ClassLabel::Malignant => bad(result.label.as_str()),
    };
    println!("  {} {}", muted("Label       "), label.bold());
    println!("  {}", kv("P(benign)   ", &format!("{:.4}", result.probabilities[0])));
    println!("  {}", kv("P(malignant)", &format!("{:.4}", result.probabilities[1])));
    println!();
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
