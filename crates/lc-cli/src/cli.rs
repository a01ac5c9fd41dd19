//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use lc_model::Severity;

#[derive(Parser)]
#[command(
    name = "lc-checker",
    version,
    about = "Documentary credit checker - SWIFT MT7xx validation and UCP 600 discrepancy detection",
    long_about = "Validate, build and parse SWIFT MT700/MT707/MT799 messages against a \
                  versioned standards directory, and compare the documents presented \
                  under a credit for UCP 600 discrepancies."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Settings file (default: ./lc-checker.toml when present).
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Standards directory (overrides the config file and LC_STANDARDS_DIR).
    #[arg(long = "standards-dir", value_name = "DIR", global = true)]
    pub standards_dir: Option<PathBuf>,

    /// Print results as JSON instead of tables.
    #[arg(long = "json", global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Inspect the standards directory.
    #[command(subcommand)]
    Standards(StandardsCommand),

    /// Show the field definitions of a message type.
    Schema(SchemaArgs),

    /// Validate field maps against their message schema.
    Validate(ValidateArgs),

    /// Build the text block of a message from a field map.
    Construct(ConstructArgs),

    /// Read a message text block and validate its fields.
    Parse(ParseArgs),

    /// Compare the documents of one or more presentations.
    Compare(CompareArgs),
}

#[derive(Subcommand)]
pub enum StandardsCommand {
    /// Verify manifest hashes and load every schema.
    Verify,
}

#[derive(Args)]
pub struct SchemaArgs {
    /// Message type, e.g. 700 or MT707.
    #[arg(value_name = "TYPE")]
    pub message_type: String,
}

#[derive(Args)]
pub struct ValidateArgs {
    /// JSON field map (tag to value), or an array of {message_type, fields}.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Message type of a single field map.
    #[arg(long = "message-type", short = 't', value_name = "TYPE")]
    pub message_type: Option<String>,
}

#[derive(Args)]
pub struct ConstructArgs {
    /// JSON field map (tag to value).
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    #[arg(long = "message-type", short = 't', value_name = "TYPE")]
    pub message_type: String,

    /// Write the text block to a file instead of stdout.
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ParseArgs {
    /// Message text block (`{4:` ... `-}`).
    #[arg(value_name = "MESSAGE")]
    pub input: PathBuf,

    #[arg(long = "message-type", short = 't', value_name = "TYPE")]
    pub message_type: String,
}

#[derive(Args)]
pub struct CompareArgs {
    /// Document set JSON files.
    #[arg(value_name = "DOCUMENT_SET", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Exit with status 1 when a discrepancy at or above this severity is found.
    #[arg(long = "fail-on", value_enum, default_value = "low")]
    pub fail_on: SeverityArg,

    /// Ignore punctuation when matching configured equivalents.
    #[arg(long = "strip-punctuation")]
    pub strip_punctuation: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum SeverityArg {
    Low,
    Medium,
    High,
    Critical,
}

impl From<SeverityArg> for Severity {
    fn from(value: SeverityArg) -> Self {
        match value {
            SeverityArg::Low => Severity::Low,
            SeverityArg::Medium => Severity::Medium,
            SeverityArg::High => Severity::High,
            SeverityArg::Critical => Severity::Critical,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
