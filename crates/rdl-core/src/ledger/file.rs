//! File-backed ledger implementation.

use std::collections::HashSet;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::error::LedgerError;
use super::types::{LedgerEntry, Status};

/// Header row written at the top of every ledger file.
pub const HEADER: [&str; 2] = ["identifier", "download status"];

/// In-memory copy of the ledger file plus its identifier index.
///
/// Owned by the batch driver; there is exactly one writer per file.
#[derive(Debug)]
pub struct StatusLedger {
    path: PathBuf,
    entries: Vec<LedgerEntry>,
    index: HashSet<String>,
}

impl StatusLedger {
    /// True if a ledger file is present at `path`.
    pub fn exists(path: &Path) -> bool {
        path.is_file()
    }

    /// Writes a new ledger holding only the header, replacing any file at `path`.
    pub fn create(path: &Path) -> Result<Self, LedgerError> {
        let ledger = StatusLedger {
            path: path.to_path_buf(),
            entries: Vec::new(),
            index: HashSet::new(),
        };
        ledger.persist()?;
        tracing::info!("created ledger at {}", path.display());
        Ok(ledger)
    }

    /// Reads an existing ledger file fully into memory.
    pub fn load(path: &Path) -> Result<Self, LedgerError> {
        let csv_err = |source| LedgerError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(csv_err)?;

        let header: Vec<String> = reader
            .headers()
            .map_err(csv_err)?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        if header != HEADER {
            return Err(LedgerError::BadHeader {
                path: path.to_path_buf(),
                expected: HEADER.join(","),
                found: header.join(","),
            });
        }

        let mut entries = Vec::new();
        let mut index = HashSet::new();
        for (i, rec) in reader.records().enumerate() {
            let record = rec.map_err(csv_err)?;
            // Data rows start on line 2 of the file.
            let row = i + 2;
            if record.len() != 2 {
                return Err(LedgerError::BadRow {
                    path: path.to_path_buf(),
                    row,
                    found: record.len(),
                });
            }
            let identifier = record[0].trim().to_string();
            let status = Status::from_str(&record[1]).ok_or_else(|| LedgerError::UnknownStatus {
                path: path.to_path_buf(),
                row,
                status: record[1].to_string(),
            })?;
            if !index.insert(identifier.clone()) {
                tracing::warn!("ledger row {}: identifier {} recorded twice", row, identifier);
            }
            entries.push(LedgerEntry { identifier, status });
        }

        tracing::info!("loaded {} ledger entries from {}", entries.len(), path.display());
        Ok(StatusLedger {
            path: path.to_path_buf(),
            entries,
            index,
        })
    }

    /// Loads the ledger at `path`, or creates it if absent.
    pub fn open(path: &Path) -> Result<Self, LedgerError> {
        if Self::exists(path) {
            Self::load(path)
        } else {
            Self::create(path)
        }
    }

    /// Identifiers already recorded; the resume-skip set.
    pub fn identifiers(&self) -> &HashSet<String> {
        &self.index
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.index.contains(identifier)
    }

    /// Entries in file order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends one entry and persists the whole ledger before returning.
    ///
    /// On a persistence error the in-memory ledger is left unchanged.
    pub fn append(&mut self, identifier: &str, status: Status) -> Result<(), LedgerError> {
        if self.index.contains(identifier) {
            return Err(LedgerError::Duplicate(identifier.to_string()));
        }
        self.entries.push(LedgerEntry {
            identifier: identifier.to_string(),
            status,
        });
        if let Err(e) = self.persist() {
            self.entries.pop();
            return Err(e);
        }
        self.index.insert(identifier.to_string());
        Ok(())
    }

    /// Rewrites the file: header and all entries go to `<path>.tmp`, which is
    /// synced and renamed over `path`.
    fn persist(&self) -> Result<(), LedgerError> {
        let tmp = temp_path(&self.path);
        let io_err = |source| LedgerError::Io {
            path: tmp.clone(),
            source,
        };
        let csv_err = |source| LedgerError::Csv {
            path: tmp.clone(),
            source,
        };

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER).map_err(csv_err)?;
        for entry in &self.entries {
            writer
                .write_record([entry.identifier.as_str(), entry.status.as_str()])
                .map_err(csv_err)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| io_err(io::Error::new(e.error().kind(), e.error().to_string())))?;

        let mut file = File::create(&tmp).map_err(io_err)?;
        file.write_all(&bytes).map_err(io_err)?;
        file.sync_all().map_err(io_err)?;
        drop(file);

        std::fs::rename(&tmp, &self.path).map_err(|source| LedgerError::Io {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}

/// Path of the scratch file used while rewriting the ledger: `<path>.tmp`.
pub fn temp_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(".tmp");
    PathBuf::from(o)
}
