//! Retrieval client: one bounded-timeout HTTP GET per candidate location.
//!
//! Uses the curl crate (libcurl) in blocking mode. Every request carries the
//! configured format query parameter. The outcome is classified into
//! success, soft failure (server answered with a non-2xx status) and hard
//! failure (the request never completed).

mod error;
mod headers;

pub use error::FetchError;

use crate::config::FetchConfig;
use std::str;

/// A successful (2xx) response body with its size metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Retrieved {
    pub body: Vec<u8>,
    /// Server-declared `Content-Length` of the final response; 0 if absent.
    pub declared_len: u64,
}

impl Retrieved {
    /// Number of body bytes actually received.
    pub fn actual_len(&self) -> u64 {
        self.body.len() as u64
    }
}

/// Classified result of a single fetch.
#[derive(Debug)]
pub enum RetrievalOutcome {
    Success(Retrieved),
    /// Server reachable but answered with this non-success status.
    SoftFailure { status: u32 },
    HardFailure(FetchError),
}

impl RetrievalOutcome {
    pub fn kind(&self) -> &'static str {
        match self {
            RetrievalOutcome::Success(_) => "success",
            RetrievalOutcome::SoftFailure { .. } => "soft-failure",
            RetrievalOutcome::HardFailure(_) => "hard-failure",
        }
    }
}

/// Something that can retrieve a candidate location.
///
/// The record processor only talks to this trait so its decision protocol can
/// be exercised without a network.
pub trait Fetch {
    fn fetch(&self, uri: &str) -> RetrievalOutcome;
}

impl<F: Fetch + ?Sized> Fetch for &F {
    fn fetch(&self, uri: &str) -> RetrievalOutcome {
        (**self).fetch(uri)
    }
}

/// Blocking libcurl client configured from `[fetch]`.
#[derive(Debug, Clone)]
pub struct CurlFetcher {
    cfg: FetchConfig,
}

impl CurlFetcher {
    pub fn new(cfg: FetchConfig) -> Self {
        Self { cfg }
    }

    /// Performs the GET. `Ok` means an HTTP response was received, whatever its status.
    fn get(&self, uri: &str) -> Result<(u32, Retrieved), FetchError> {
        let url = request_url(uri, &self.cfg.format_param, &self.cfg.format_value)?;

        let mut body: Vec<u8> = Vec::new();
        let mut header_lines: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(self.cfg.max_redirects)?;
        easy.connect_timeout(self.cfg.connect_timeout())?;
        // Abort when fewer than 1 byte/s arrives for the read timeout window.
        easy.low_speed_limit(1)?;
        easy.low_speed_time(self.cfg.read_timeout())?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let code = easy.response_code()?;
        let declared_len = headers::declared_content_length(&header_lines);
        Ok((code, Retrieved { body, declared_len }))
    }
}

impl Fetch for CurlFetcher {
    fn fetch(&self, uri: &str) -> RetrievalOutcome {
        match self.get(uri) {
            Ok((code, retrieved)) if (200..300).contains(&code) => {
                tracing::debug!(
                    uri,
                    status = code,
                    declared = retrieved.declared_len,
                    received = retrieved.actual_len(),
                    "fetched"
                );
                RetrievalOutcome::Success(retrieved)
            }
            Ok((code, _)) => {
                tracing::debug!(uri, status = code, "server answered with non-success status");
                RetrievalOutcome::SoftFailure { status: code }
            }
            Err(e) => {
                tracing::debug!(uri, timeout = e.is_timeout(), "fetch failed: {}", e);
                RetrievalOutcome::HardFailure(e)
            }
        }
    }
}

/// Builds the request URL: validates `uri` and appends `param=value` to its query.
pub fn request_url(uri: &str, param: &str, value: &str) -> Result<url::Url, FetchError> {
    let uri = uri.trim();
    if uri.is_empty() {
        return Err(FetchError::MissingLocation);
    }
    let mut url = url::Url::parse(uri).map_err(|source| FetchError::InvalidUri {
        uri: uri.to_string(),
        source,
    })?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
    }
    url.query_pairs_mut().append_pair(param, value);
    Ok(url)
}
