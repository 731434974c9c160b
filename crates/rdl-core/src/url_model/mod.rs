//! Filename derivation for staging and stored documents.

mod path;
mod sanitize;

pub use path::last_path_segment;
pub use sanitize::sanitize_filename_for_linux;

/// Staging filename for a body fetched from `uri`: its sanitized base name.
///
/// Returns `None` when the location has no usable base name (e.g. it ends in `/`);
/// the caller then stages at the output directory itself.
pub fn staging_name(uri: &str) -> Option<String> {
    let raw = last_path_segment(uri)?;
    let sanitized = sanitize_filename_for_linux(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        None
    } else {
        Some(sanitized)
    }
}

/// Final filename for a validated document: `<identifier>.<ext>`.
pub fn document_name(identifier: &str, extension: &str) -> String {
    format!(
        "{}.{}",
        sanitize_filename_for_linux(identifier),
        extension.trim_start_matches('.')
    )
}
