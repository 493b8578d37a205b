//! calbridge command-line interface.
//!
//! Fetches a calendar feed (ICS or loosely-structured JSON), runs it
//! through the normalization engine, and writes either re-serialized ICS
//! or a structured JSON event list.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;

pub use cli::{Cli, Command, ConfigAction, OutputFormat, PolicyArg};
pub use config::CliConfig;
pub use error::{CliError, CliResult};
