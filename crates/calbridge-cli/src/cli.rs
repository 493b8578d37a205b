//! Command-line interface definition.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

use calbridge_engine::OutputPolicy;

/// calbridge - Normalize calendar feeds for import
#[derive(Debug, Parser)]
#[command(name = "calbridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Feed source: http(s):// or webcal:// URL, or a local file path
    pub source: Option<String>,

    /// Output file path
    pub output: Option<PathBuf>,

    /// Source identifier used for the description tag, e.g. "league7"
    #[arg(long, short = 's')]
    pub source_id: Option<String>,

    /// Output format (inferred from the output extension when omitted)
    #[arg(long, short = 'f', value_enum)]
    pub format: Option<OutputFormat>,

    /// Normalization policy
    #[arg(long, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Display zone for the local-with-zone policy (IANA identifier)
    #[arg(long)]
    pub display_zone: Option<String>,

    /// Fallback zone for floating times (IANA identifier)
    #[arg(long)]
    pub fallback_zone: Option<String>,

    /// Width at which output ICS lines are folded
    #[arg(long)]
    pub fold_width: Option<usize>,

    /// Path to configuration file
    #[arg(long, short, env = "CALBRIDGE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Dump,
    /// Check the configuration for problems
    Validate,
    /// Show the configuration file path
    Path,
}

/// Output document format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Re-serialized iCalendar text
    Ics,
    /// Structured JSON event list
    Json,
}

impl OutputFormat {
    /// Infers the format from an output path, defaulting to ICS.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Ics,
        }
    }
}

/// Normalization policy flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Anchor every resolved time to UTC
    Utc,
    /// Emit wall-clock times in the display zone, zone stated explicitly
    Local,
}

impl From<PolicyArg> for OutputPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Utc => OutputPolicy::Utc,
            PolicyArg::Local => OutputPolicy::LocalWithZone,
        }
    }
}
