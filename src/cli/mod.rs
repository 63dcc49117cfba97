//! Command-line interface wiring for diapredict.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod assess;
pub mod batch;
pub mod ping;
pub mod serve;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Diabetes risk assessment client", long_about = None)]
pub struct Cli {
    /// Prediction engine base URL; overrides DIAPREDICT_API_URL.
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        let settings = settings.with_api_url(self.api_url.as_deref());
        match self.command {
            Commands::Serve(args) => serve::run(args, settings).await,
            Commands::Assess(args) => assess::run(args, settings).await,
            Commands::Batch(args) => batch::run(args, settings).await,
            Commands::Ping => ping::run(settings).await,
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Serve the assessment screens over HTTP.
    Serve(serve::Args),
    /// Run one assessment and print the result.
    Assess(assess::Args),
    /// Assess every row of a CSV file.
    Batch(batch::Args),
    /// Check that the prediction engine is reachable.
    Ping,
}
