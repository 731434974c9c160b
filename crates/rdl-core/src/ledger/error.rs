use std::path::PathBuf;
use thiserror::Error;

/// Ledger failures. Any of these stops the batch: without a trustworthy ledger
/// a resumed run could repeat or lose work.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("ledger {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("ledger {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("ledger {path}: expected header \"{expected}\", found \"{found}\"")]
    BadHeader {
        path: PathBuf,
        expected: String,
        found: String,
    },
    #[error("ledger {path} row {row}: unknown status {status:?}")]
    UnknownStatus {
        path: PathBuf,
        row: usize,
        status: String,
    },
    #[error("ledger {path} row {row}: expected 2 columns, found {found}")]
    BadRow {
        path: PathBuf,
        row: usize,
        found: usize,
    },
    #[error("identifier {0:?} is already recorded")]
    Duplicate(String),
}
