//! Entry point for the RDL batch: one input table, no flags.

use anyhow::Result;
use clap::Parser;
use rdl_core::batch::{self, BatchSummary};
use rdl_core::config;
use std::path::PathBuf;

/// Download every report listed in the input table, resuming from the status ledger.
#[derive(Debug, Parser)]
#[command(name = "rdl")]
#[command(about = "RDL: resumable batch downloader for report documents", long_about = None)]
pub struct Cli {
    /// Input table (CSV). Defaults to `input_path` from config.toml.
    pub input: Option<PathBuf>,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        Cli::parse().run()
    }

    fn run(self) -> Result<()> {
        let mut cfg = config::load_or_init()?;
        if let Some(input) = self.input {
            cfg.input_path = input;
        }
        let cfg = cfg.resolved_against(&std::env::current_dir()?);
        tracing::debug!("loaded config: {:?}", cfg);

        let summary = batch::run(&cfg)?;
        println!("{}", render_summary(&summary));
        Ok(())
    }
}

fn render_summary(s: &BatchSummary) -> String {
    format!(
        "{} record(s): {} downloaded, {} not downloaded, {} missing path, {} already recorded",
        s.records, s.downloaded, s.not_downloaded, s.missing_path, s.skipped
    )
}
