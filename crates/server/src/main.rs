//! Web form entry point.

use anyhow::Context;
use hydrosense_server::config::AppConfig;
use hydrosense_server::{build_pipeline, load_predictor, start_server, telemetry, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("loading configuration")?;
    telemetry::init(&config.log);

    let predictor = load_predictor(&config.models).context("loading classifier artifacts")?;
    let state = AppState::new(build_pipeline(&config.ocr), predictor);

    tracing::info!("Starting Hydration and Seasonal Context Analyzer");
    start_server(&config.server, state)
        .await
        .with_context(|| format!("serving on {}", config.server.bind_addr))?;

    Ok(())
}
