//! Reasons a fetch never produced an HTTP response.

use thiserror::Error;

/// Why a candidate location could not be retrieved at the transport level.
///
/// Every variant maps to a hard failure: the request did not complete, as opposed
/// to a server that answered with a non-success status.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The location cell was empty.
    #[error("no location given")]
    MissingLocation,
    /// The location is not a parseable absolute URL.
    #[error("invalid URL {uri:?}: {source}")]
    InvalidUri {
        uri: String,
        #[source]
        source: url::ParseError,
    },
    /// The URL parsed but does not use http or https.
    #[error("unsupported URL scheme {0:?}")]
    UnsupportedScheme(String),
    /// libcurl reported an error (timeout, DNS, connection refused, reset...).
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
}

impl FetchError {
    /// True when the error came from a connect or read timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Transport(e) if e.is_operation_timedout())
    }
}
