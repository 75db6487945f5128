//! HTTP service for the segment engine.
//!
//! # Usage
//!
//! ```bash
//! # Defaults: ./config/default, 127.0.0.1:8080
//! segment-engine
//!
//! # Alternate config and preference mapping
//! segment-engine --config-dir ./config/site --preferences ./prefs.yaml --bind 0.0.0.0:9000
//!
//! # Per-row decisions
//! RUST_LOG=segment_engine=debug segment-engine
//! ```

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use segment_engine::api::{AppState, create_router};
use segment_engine::config::ConfigLoader;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory holding engine.yaml and labor_codes.yaml
    #[arg(long, default_value = "config/default")]
    config_dir: PathBuf,

    /// Preference mapping file; replaces preferences.yaml from the config directory
    #[arg(long)]
    preferences: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("segment_engine=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut loader = ConfigLoader::load(&args.config_dir).with_context(|| {
        format!("loading configuration from {}", args.config_dir.display())
    })?;
    if let Some(path) = &args.preferences {
        let preferences = ConfigLoader::load_preferences(path)
            .with_context(|| format!("loading preferences from {}", path.display()))?;
        loader = loader.with_preferences(preferences);
    }

    info!(
        config_dir = %args.config_dir.display(),
        sentinel = %loader.engine().sentinel,
        preferences = loader.preferences().len(),
        "Configuration loaded"
    );

    let router = create_router(AppState::new(loader));
    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("binding {}", args.bind))?;

    info!(bind = %args.bind, "Listening");
    axum::serve(listener, router).await?;

    Ok(())
}
