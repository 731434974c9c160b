//! Downloaded-artifact validation.
//!
//! A retrieved body is a usable document only if it is non-empty, matches the
//! server-declared length (when one was declared), and parses as a PDF with at
//! least one page.

use anyhow::{Context, Result};
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

/// Why a retrieved body was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    Empty,
    LengthMismatch { declared: u64, actual: u64 },
    Unparseable(String),
    NoPages,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Empty => write!(f, "empty body"),
            Rejection::LengthMismatch { declared, actual } => {
                write!(f, "declared {} bytes, received {}", declared, actual)
            }
            Rejection::Unparseable(e) => write!(f, "not a readable document: {}", e),
            Rejection::NoPages => write!(f, "document has no pages"),
        }
    }
}

/// Checks `bytes` against the four validation rules, in order.
///
/// `declared_len` of 0 means the server declared no length.
pub fn check(bytes: &[u8], declared_len: u64) -> Result<u32, Rejection> {
    let actual = bytes.len() as u64;
    if actual == 0 {
        return Err(Rejection::Empty);
    }
    if declared_len != 0 && declared_len != actual {
        return Err(Rejection::LengthMismatch {
            declared: declared_len,
            actual,
        });
    }
    let pages = guarded(|| count_pages(bytes))?;
    if pages == 0 {
        return Err(Rejection::NoPages);
    }
    Ok(pages)
}

fn count_pages(bytes: &[u8]) -> Result<u32, Rejection> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| Rejection::Unparseable(e.to_string()))?;
    Ok(doc.get_pages().len() as u32)
}

/// Runs a parse step over untrusted bytes; a panic inside it is a rejection.
fn guarded<T>(step: impl FnOnce() -> Result<T, Rejection>) -> Result<T, Rejection> {
    panic::catch_unwind(AssertUnwindSafe(step))
        .unwrap_or_else(|_| Err(Rejection::Unparseable("parser panicked".to_string())))
}

/// True if `bytes` form a complete, readable document of the declared size.
pub fn validate(bytes: &[u8], declared_len: u64) -> bool {
    check(bytes, declared_len).is_ok()
}

/// Reads the file at `path` back from disk and checks it.
///
/// The outer `Result` is for I/O; a readable file that fails a rule is `Ok(Err(_))`.
pub fn check_file(path: &Path, declared_len: u64) -> Result<Result<u32, Rejection>> {
    let bytes = std::fs::read(path).with_context(|| format!("read back {}", path.display()))?;
    Ok(check(&bytes, declared_len))
}

#[cfg(test)]
pub(crate) mod testdoc {
    use lopdf::{dictionary, Document, Object};

    /// Serializes a minimal PDF with `pages` empty A4 pages.
    pub fn pdf_with_pages(pages: usize) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let mut kids: Vec<Object> = Vec::new();
        for _ in 0..pages {
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }
        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }
}
