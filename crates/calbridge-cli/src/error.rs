//! CLI error types.

use thiserror::Error;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Errors that abort a CLI run.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error (file or flag values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Fetching the feed failed; no output is written.
    #[error(transparent)]
    Fetch(#[from] calbridge_fetch::FetchError),

    /// The input document could not be processed at all.
    #[error(transparent)]
    Engine(#[from] calbridge_engine::EngineError),

    /// Writing the output file failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}
