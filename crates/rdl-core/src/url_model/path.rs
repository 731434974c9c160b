//! Base name extraction from a location URL.

/// Returns the last segment of the URL path, as written (no percent-decoding).
///
/// Returns `None` if the URL cannot be parsed or its path ends in `/`.
pub fn last_path_segment(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url.trim()).ok()?;
    let segment = parsed.path_segments()?.last()?;
    if segment.is_empty() {
        return None;
    }
    Some(segment.to_string())
}
