//! Feed source identifiers.
//!
//! A source is either a URL (`http://`, `https://`, or `webcal://`, the
//! latter rewritten to `https://` before fetching) or a local file path.

use std::fmt;
use std::path::PathBuf;

use url::Url;

use crate::error::FetchError;

/// Where a feed comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// A remote feed fetched over HTTP(S).
    Url(Url),
    /// A local feed file.
    File(PathBuf),
}

impl Source {
    /// Parses a source identifier.
    ///
    /// `webcal://` URLs are rewritten to `https://`; anything that does
    /// not look like an `http(s)`/`webcal` URL is treated as a file path.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidUrl`] when a URL-shaped identifier
    /// fails to parse.
    pub fn parse(identifier: &str) -> Result<Self, FetchError> {
        let identifier = identifier.trim();

        let rewritten;
        let candidate = if let Some(rest) = identifier.strip_prefix("webcal://") {
            rewritten = format!("https://{rest}");
            rewritten.as_str()
        } else {
            identifier
        };

        let lower = candidate.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            let url = Url::parse(candidate).map_err(|source| FetchError::InvalidUrl {
                url: identifier.to_string(),
                source,
            })?;
            Ok(Self::Url(url))
        } else {
            Ok(Self::File(PathBuf::from(identifier)))
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
