//! Parse HTTP response header lines collected by the curl header callback.

/// Returns the `Content-Length` of the final response in `lines`, or 0 if absent.
///
/// With redirects, libcurl delivers the headers of every hop; a status line
/// (`HTTP/...`) starts a new response so earlier values are discarded.
pub(crate) fn declared_content_length(lines: &[String]) -> u64 {
    let mut content_length = 0;

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            content_length = 0;
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.trim().parse::<u64>() {
                    content_length = n;
                }
            }
        }
    }

    content_length
}
