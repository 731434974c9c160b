//! Per-record retrieval with one fallback attempt.
//!
//! Decision protocol for a record:
//! - no location at all: `missing-path`, nothing is fetched;
//! - primary hard failure (transport error, timeout, absent or malformed URL):
//!   the secondary location decides the outcome;
//! - primary soft failure (non-2xx status): `not-downloaded`, the secondary
//!   location is NOT tried;
//! - primary success: the body is stored and validated; if that fails the
//!   secondary location decides the outcome.
//!
//! The secondary attempt is stored and validated the same way; any failure there
//! is `not-downloaded`.

use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use crate::checksum;
use crate::fetch::{Fetch, FetchError, RetrievalOutcome, Retrieved};
use crate::input::InputRecord;
use crate::ledger::Status;
use crate::storage::{self, StagedFile};
use crate::url_model;
use crate::validate;

/// Turns an `InputRecord` into a terminal `Status`, storing the document on success.
pub struct RecordProcessor<F> {
    fetcher: F,
    output_dir: PathBuf,
    extension: String,
}

impl<F: Fetch> RecordProcessor<F> {
    pub fn new(fetcher: F, output_dir: &Path, extension: &str) -> Self {
        Self {
            fetcher,
            output_dir: output_dir.to_path_buf(),
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Processes one record. Never fails: every error becomes `not-downloaded`,
    /// and so does a panic while fetching or storing.
    pub fn process(&self, record: &InputRecord) -> Status {
        match panic::catch_unwind(AssertUnwindSafe(|| self.decide(record))) {
            Ok(status) => status,
            Err(_) => {
                tracing::error!(record = record.identifier.as_str(), "processing panicked");
                Status::NotDownloaded
            }
        }
    }

    fn decide(&self, record: &InputRecord) -> Status {
        let id = record.identifier.as_str();
        if record.has_no_location() {
            tracing::info!(record = id, "no location given");
            return Status::MissingPath;
        }

        match self.fetch(record.primary.as_deref()) {
            RetrievalOutcome::HardFailure(e) => {
                tracing::info!(record = id, "primary location unreachable ({}); trying secondary", e);
                self.process_secondary(record)
            }
            RetrievalOutcome::SoftFailure { status } => {
                tracing::info!(record = id, status, "primary location answered with HTTP {}", status);
                Status::NotDownloaded
            }
            RetrievalOutcome::Success(retrieved) => {
                let uri = record.primary.as_deref().unwrap_or_default();
                match self.store(id, uri, &retrieved) {
                    Status::Downloaded => Status::Downloaded,
                    _ => {
                        tracing::info!(record = id, "primary document rejected; trying secondary");
                        self.process_secondary(record)
                    }
                }
            }
        }
    }

    fn process_secondary(&self, record: &InputRecord) -> Status {
        let id = record.identifier.as_str();
        match self.fetch(record.secondary.as_deref()) {
            RetrievalOutcome::Success(retrieved) => {
                let uri = record.secondary.as_deref().unwrap_or_default();
                self.store(id, uri, &retrieved)
            }
            other => {
                tracing::info!(record = id, outcome = other.kind(), "secondary location failed");
                Status::NotDownloaded
            }
        }
    }

    /// An absent location is a hard failure that never reaches the network.
    fn fetch(&self, location: Option<&str>) -> RetrievalOutcome {
        match location {
            Some(uri) => self.fetcher.fetch(uri),
            None => RetrievalOutcome::HardFailure(FetchError::MissingLocation),
        }
    }

    fn store(&self, id: &str, uri: &str, retrieved: &Retrieved) -> Status {
        match self.materialize(id, uri, retrieved) {
            Ok(status) => status,
            Err(e) => {
                tracing::warn!(record = id, "storing {} failed: {:#}", uri, e);
                Status::NotDownloaded
            }
        }
    }

    /// Writes the body to its staging file, validates it from disk, then renames
    /// it to `<identifier>.<ext>` or removes it.
    fn materialize(&self, id: &str, uri: &str, retrieved: &Retrieved) -> Result<Status> {
        // No usable base name stages at the output directory itself, which
        // resolve_staging_target handles like any other directory.
        let candidate = match url_model::staging_name(uri) {
            Some(name) => self.output_dir.join(name),
            None => self.output_dir.clone(),
        };
        let Some(target) = storage::resolve_staging_target(&candidate, &self.extension)? else {
            return Ok(Status::NotDownloaded);
        };

        let staged = StagedFile::write(&target, &retrieved.body)?;
        let verdict = match validate::check_file(staged.path(), retrieved.declared_len) {
            Ok(v) => v,
            Err(e) => {
                let _ = staged.discard();
                return Err(e);
            }
        };

        match verdict {
            Ok(pages) => {
                let final_path = self
                    .output_dir
                    .join(url_model::document_name(id, &self.extension));
                staged.finalize(&final_path)?;
                match checksum::sha256_path(&final_path) {
                    Ok(digest) => tracing::info!(
                        record = id,
                        pages,
                        sha256 = %digest,
                        "stored {}",
                        final_path.display()
                    ),
                    Err(e) => tracing::warn!(record = id, "checksum of {} failed: {:#}", final_path.display(), e),
                }
                Ok(Status::Downloaded)
            }
            Err(rejection) => {
                tracing::warn!(record = id, "discarding body from {}: {}", uri, rejection);
                staged.discard()?;
                Ok(Status::NotDownloaded)
            }
        }
    }
}
