//! CLI entry-point for checking engine liveness.

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::{config::Settings, engine::PredictClient};

#[instrument(skip(settings))]
pub async fn run(settings: Settings) -> Result<()> {
    let client = PredictClient::new(&settings)?;
    let status = client
        .status()
        .await
        .with_context(|| format!("engine at {} is not reachable", client.base_url()))?;
    info!(status = %status.status, "engine answered");
    println!("{}: {} {}", client.base_url(), status.status, status.message);
    Ok(())
}
