use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Whiff CLI options.
#[derive(Debug, Parser)]
#[command(
    name = "whiff",
    version,
    about = "Detect code smells in parsed source trees",
    args_conflicts_with_subcommands = true,
    subcommand_precedence_over_arg = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub examine: ExamineArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Examine files or directories.
    Examine(ExamineArgs),

    /// List available detectors.
    ListDetectors,

    /// Explain a detector.
    Explain {
        /// Detector name (smell subclass).
        detector: String,
    },
}

#[derive(Debug, Clone, ClapArgs)]
pub struct ExamineArgs {
    /// Files/directories to examine. Defaults to stdin when absent.
    #[arg(value_name = "PATH")]
    pub paths: Vec<PathBuf>,

    /// Path to a whiff.toml config file. If omitted, whiff merges every
    /// config found in parent directories.
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    pub format: OutputFormat,

    /// Run every detector regardless of the configured `enabled` flags.
    #[arg(long)]
    pub show_all: bool,

    /// Only run these detectors (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub only: Vec<String>,

    /// Skip these detectors (comma-separated).
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Json,
}
