//! Batch driver: input table → per-record processing → status ledger.
//!
//! Records are handled strictly one after another in input order. Each status
//! is persisted to the ledger before the next record starts, so an interrupted
//! run resumes by skipping every identifier already in the ledger.

use anyhow::{Context, Result};
use std::fs;

use crate::config::RdlConfig;
use crate::fetch::{CurlFetcher, Fetch};
use crate::input::{self, InputRecord};
use crate::ledger::{Status, StatusLedger};
use crate::processor::RecordProcessor;

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Records read from the input (after the record limit).
    pub records: usize,
    /// Records skipped because the ledger already had them.
    pub skipped: usize,
    pub downloaded: usize,
    pub not_downloaded: usize,
    pub missing_path: usize,
}

impl BatchSummary {
    fn record(&mut self, status: Status) {
        match status {
            Status::Downloaded => self.downloaded += 1,
            Status::NotDownloaded => self.not_downloaded += 1,
            Status::MissingPath => self.missing_path += 1,
        }
    }

    /// Records processed (not skipped) in this run.
    pub fn processed(&self) -> usize {
        self.downloaded + self.not_downloaded + self.missing_path
    }
}

/// Runs the batch described by `cfg` over HTTP.
pub fn run(cfg: &RdlConfig) -> Result<BatchSummary> {
    run_with(cfg, CurlFetcher::new(cfg.fetch.clone()))
}

/// Runs the batch described by `cfg` with the given fetcher.
///
/// Fails only on setup errors (unreadable input, unusable ledger, output
/// directory not creatable) or when the ledger cannot be persisted.
pub fn run_with<F: Fetch>(cfg: &RdlConfig, fetcher: F) -> Result<BatchSummary> {
    let records = input::read_records(&cfg.input_path, &cfg.columns, cfg.record_limit)?;
    tracing::info!(
        "read {} record(s) from {} (limit {})",
        records.len(),
        cfg.input_path.display(),
        cfg.record_limit
    );

    let mut ledger = StatusLedger::open(&cfg.ledger_path)?;
    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("create output dir: {}", cfg.output_dir.display()))?;

    let processor = RecordProcessor::new(fetcher, &cfg.output_dir, &cfg.document_extension);
    run_records(&records, &mut ledger, &processor)
}

/// Processes `records` in order, appending each new status to `ledger`.
pub fn run_records<F: Fetch>(
    records: &[InputRecord],
    ledger: &mut StatusLedger,
    processor: &RecordProcessor<F>,
) -> Result<BatchSummary> {
    let mut summary = BatchSummary {
        records: records.len(),
        ..BatchSummary::default()
    };

    for record in records {
        let id = record.identifier.as_str();
        if ledger.contains(id) {
            tracing::debug!(record = id, "already in ledger; skipped");
            summary.skipped += 1;
            continue;
        }

        let status = processor.process(record);
        ledger
            .append(id, status)
            .with_context(|| format!("record {} finished as {} but was not recorded", id, status))?;
        tracing::info!(record = id, status = status.as_str(), "recorded");
        summary.record(status);
    }

    tracing::info!(
        "batch done: {} processed, {} skipped ({} downloaded, {} not downloaded, {} missing path)",
        summary.processed(),
        summary.skipped,
        summary.downloaded,
        summary.not_downloaded,
        summary.missing_path
    );
    Ok(summary)
}
