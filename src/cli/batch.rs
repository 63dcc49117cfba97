//! CLI entry-point for assessing a CSV of patients.

use std::{fs::File, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{batch, config::Settings, engine::PredictClient};

/// Args for the `batch` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// CSV with a header row using the engine's field names.
    #[arg(long)]
    pub input: PathBuf,
    /// Report destination; stdout when omitted.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let client = PredictClient::new(&settings)?;
    let file =
        File::open(&args.input).with_context(|| format!("open {}", args.input.display()))?;
    let rows = batch::assess_csv(file, &client).await?;
    match &args.output {
        Some(path) => batch::write_report_to_path(&rows, path),
        None => batch::write_report(&rows, std::io::stdout().lock()),
    }
}
