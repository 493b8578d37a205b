//! Error types for feed fetching.
//!
//! A fetch failure is fatal for the run: the caller surfaces it to the
//! operator and writes no output.

use thiserror::Error;

/// An error that occurred while fetching a feed.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source identifier was not a usable URL.
    #[error("invalid source URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Transport-level HTTP failure (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    /// Reading a local feed file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A specialized Result type for fetch operations.
pub type FetchResult<T> = Result<T, FetchError>;
