//! Types stored in the status ledger.

use std::fmt;

/// Terminal outcome of processing one record, stored as a string code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// A validated document was stored as `<identifier>.<ext>`.
    Downloaded,
    /// Every attempt failed (network, HTTP status, validation, filesystem).
    NotDownloaded,
    /// The record had neither a primary nor a secondary location.
    MissingPath,
}

impl Status {
    pub const ALL: [Status; 3] = [Status::Downloaded, Status::NotDownloaded, Status::MissingPath];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Downloaded => "downloaded",
            Status::NotDownloaded => "not-downloaded",
            Status::MissingPath => "missing-path",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim() {
            "downloaded" => Some(Status::Downloaded),
            "not-downloaded" => Some(Status::NotDownloaded),
            "missing-path" => Some(Status::MissingPath),
            _ => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One ledger row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerEntry {
    pub identifier: String,
    pub status: Status,
}
