//! Disk side of a retrieval: staging file, finalize and discard.
//!
//! A fetched body is first written under a staging name inside the output
//! directory, validated from disk, then either renamed to its final name or
//! removed.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Picks the file a staged body is written to.
///
/// Normally that is `candidate` itself. If `candidate` is an existing directory,
/// the directory is searched (non-recursively, in name order) for a regular file
/// ending in `.<extension>` and the first match is reused. `Ok(None)` means the
/// directory holds no such file.
pub fn resolve_staging_target(candidate: &Path, extension: &str) -> Result<Option<PathBuf>> {
    if !candidate.is_dir() {
        return Ok(Some(candidate.to_path_buf()));
    }

    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let mut matches: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(candidate)
        .with_context(|| format!("list staging directory {}", candidate.display()))?
    {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(&suffix) {
            matches.push(entry.path());
        }
    }
    matches.sort();

    let found = matches.into_iter().next();
    match &found {
        Some(p) => tracing::warn!(
            "staging path {} is a directory; reusing {}",
            candidate.display(),
            p.display()
        ),
        None => tracing::warn!(
            "staging path {} is a directory with no .{} file",
            candidate.display(),
            extension
        ),
    }
    Ok(found)
}

/// A body written to disk, awaiting validation.
#[derive(Debug)]
pub struct StagedFile {
    path: PathBuf,
}

impl StagedFile {
    /// Writes `bytes` to `path` (truncating) and syncs it.
    pub fn write(path: &Path, bytes: &[u8]) -> Result<Self> {
        let mut file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("failed to create staging file: {}", path.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("write staging file: {}", path.display()))?;
        file.sync_all().context("staging sync failed")?;
        Ok(StagedFile {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Renames the staged file to `final_path`, replacing any existing file.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        fs::rename(&self.path, final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.path.display(),
                final_path.display()
            )
        })?;
        Ok(())
    }

    /// Removes the staged file.
    pub fn discard(self) -> Result<()> {
        fs::remove_file(&self.path)
            .with_context(|| format!("failed to remove {}", self.path.display()))?;
        Ok(())
    }
}
