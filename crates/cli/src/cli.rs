//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Market Uploader - forwards marketplace order listings to ingest sinks
#[derive(Parser, Debug)]
#[command(
    name = "market-uploader",
    author,
    version,
    about = "Marketplace order uploader",
    long_about = "Normalizes marketplace order listings observed in a game session and\n\
                  forwards them as correlated batches to a pub/sub topic and any number\n\
                  of HTTP ingest endpoints."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MARKET_UPLOADER_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "MARKET_UPLOADER_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay recorded marketplace events through the uploader
    Replay(ReplayArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display configuration information
    Info(InfoArgs),
}

/// Arguments for the `replay` command
#[derive(Parser, Debug, Clone)]
pub struct ReplayArgs {
    /// Path to configuration file (TOML or JSON)
    #[arg(
        short,
        long,
        default_value = "config.toml",
        env = "MARKET_UPLOADER_CONFIG"
    )]
    pub config: PathBuf,

    /// Recorded events, one JSON `MarketEvent` per line
    #[arg(short, long, env = "MARKET_UPLOADER_EVENTS")]
    pub events: PathBuf,

    /// Override the initial session location from configuration
    #[arg(long, env = "MARKET_UPLOADER_LOCATION")]
    pub location: Option<String>,

    /// Maximum number of events to replay (0 = unlimited)
    #[arg(long, default_value = "0")]
    pub max_events: u64,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "MARKET_UPLOADER_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for observability::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => Self::Json,
            LogFormat::Pretty => Self::Pretty,
            LogFormat::Compact => Self::Compact,
        }
    }
}
