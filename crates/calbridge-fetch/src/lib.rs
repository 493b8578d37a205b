//! Feed fetching.
//!
//! This crate is the engine's only I/O collaborator: it turns a source
//! identifier into feed text, once, before parsing begins. Fetching is the
//! only cancellable, timeout-bound step of a run; a failure here is fatal
//! (no partial output is ever written from a failed fetch).

pub mod error;
pub mod source;

pub use error::{FetchError, FetchResult};
pub use source::Source;

use std::time::Duration;

use tracing::debug;

/// Default bound on one HTTP fetch.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Bound on one HTTP request.
    pub timeout: Duration,
    /// User-Agent header sent with HTTP requests.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("calbridge/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetches feed text from URLs and local files.
pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    /// Creates a fetcher with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] when the HTTP client cannot be built.
    pub fn new(config: &FetchConfig) -> FetchResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Fetches the feed text behind a source identifier.
    ///
    /// # Errors
    ///
    /// Any failure is a [`FetchError`]; the run must stop without output.
    pub async fn fetch(&self, source: &Source) -> FetchResult<String> {
        match source {
            Source::Url(url) => {
                debug!(url = %url, "fetching feed over HTTP");
                let response = self.client.get(url.clone()).send().await?;
                let status = response.status();
                if !status.is_success() {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                    });
                }
                Ok(response.text().await?)
            }
            Source::File(path) => {
                debug!(path = %path.display(), "reading feed file");
                tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| FetchError::Io {
                        path: path.display().to_string(),
                        source,
                    })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config() {
        let config = FetchConfig::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert!(config.user_agent.starts_with("calbridge/"));
    }

    #[tokio::test]
    async fn reads_local_files() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n").unwrap();

        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let source = Source::File(file.path().to_path_buf());
        let text = fetcher.fetch(&source).await.unwrap();
        assert!(text.starts_with("BEGIN:VCALENDAR"));
    }

    #[tokio::test]
    async fn missing_file_is_a_fetch_failure() {
        let fetcher = Fetcher::new(&FetchConfig::default()).unwrap();
        let source = Source::File("/nonexistent/feed.ics".into());
        let err = fetcher.fetch(&source).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
    }
}
