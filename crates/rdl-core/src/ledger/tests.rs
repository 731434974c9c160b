//! Tests for the status ledger (files live in a temp directory).

use super::*;
use std::fs;

#[test]
fn status_codes_roundtrip() {
    for s in Status::ALL {
        assert_eq!(Status::from_str(s.as_str()), Some(s));
    }
    assert_eq!(Status::from_str("downloadet"), None);
    assert_eq!(Status::NotDownloaded.to_string(), "not-downloaded");
}

#[test]
fn create_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    assert!(!StatusLedger::exists(&path));

    let ledger = StatusLedger::create(&path).unwrap();
    assert!(ledger.is_empty());
    assert!(StatusLedger::exists(&path));
    assert_eq!(fs::read_to_string(&path).unwrap(), "identifier,download status\n");
}

#[test]
fn append_is_durable_and_ordered() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    let mut ledger = StatusLedger::create(&path).unwrap();

    let rows = [
        ("BR3", Status::Downloaded),
        ("BR1", Status::MissingPath),
        ("BR2", Status::NotDownloaded),
    ];
    for (id, status) in rows {
        ledger.append(id, status).unwrap();
    }
    assert!(!temp_path(&path).exists());

    let reloaded = StatusLedger::load(&path).unwrap();
    let got: Vec<(&str, Status)> = reloaded
        .entries()
        .iter()
        .map(|e| (e.identifier.as_str(), e.status))
        .collect();
    assert_eq!(got, rows.to_vec());
    assert_eq!(reloaded.identifiers().len(), 3);
    assert!(reloaded.contains("BR2"));
}

#[test]
fn open_loads_existing_and_appends_across_runs() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    {
        let mut first = StatusLedger::open(&path).unwrap();
        first.append("A", Status::Downloaded).unwrap();
    }
    let mut second = StatusLedger::open(&path).unwrap();
    assert!(second.contains("A"));
    second.append("B", Status::NotDownloaded).unwrap();

    let third = StatusLedger::open(&path).unwrap();
    assert_eq!(third.len(), 2);
    assert_eq!(third.entries()[0].identifier, "A");
    assert_eq!(third.entries()[1].status, Status::NotDownloaded);
}

#[test]
fn duplicate_append_rejected_and_file_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    let mut ledger = StatusLedger::create(&path).unwrap();
    ledger.append("A", Status::Downloaded).unwrap();
    let before = fs::read_to_string(&path).unwrap();

    let err = ledger.append("A", Status::NotDownloaded).unwrap_err();
    assert!(matches!(err, LedgerError::Duplicate(ref id) if id == "A"));
    assert_eq!(ledger.len(), 1);
    assert_eq!(fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn identifiers_with_commas_and_quotes_survive() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    let mut ledger = StatusLedger::create(&path).unwrap();
    ledger.append("ACME, Inc \"2019\"", Status::Downloaded).unwrap();
    let reloaded = StatusLedger::load(&path).unwrap();
    assert!(reloaded.contains("ACME, Inc \"2019\""));
}

#[test]
fn load_rejects_unknown_status() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    fs::write(&path, "identifier,download status\nA,downloaded\nB,maybe\n").unwrap();
    let err = StatusLedger::load(&path).unwrap_err();
    assert!(matches!(err, LedgerError::UnknownStatus { row: 3, .. }));
}

#[test]
fn load_rejects_foreign_header() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    fs::write(&path, "BRnum,Pdf_URL,Report Html Address\n").unwrap();
    assert!(matches!(
        StatusLedger::load(&path).unwrap_err(),
        LedgerError::BadHeader { .. }
    ));
}

#[test]
fn load_rejects_short_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("status.csv");
    fs::write(&path, "identifier,download status\nA\n").unwrap();
    assert!(matches!(
        StatusLedger::load(&path).unwrap_err(),
        LedgerError::BadRow { row: 2, found: 1, .. }
    ));
}
