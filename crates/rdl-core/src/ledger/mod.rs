//! Durable status ledger (CSV file with an `identifier` and a `download status` column).
//!
//! Maps record identifiers to their terminal status so an interrupted batch can
//! resume. The whole file is rewritten (temp file + rename) on every append.

mod error;
pub mod file;
pub mod types;

pub use error::LedgerError;
pub use file::*;
pub use types::*;

#[cfg(test)]
mod tests;
