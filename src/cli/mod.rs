//! Command-line interface definitions.

pub mod check;
pub mod output;
pub mod run;
pub mod scan;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fundwatch - cross-exchange funding-rate spread scanner.
#[derive(Parser, Debug)]
#[command(name = "fundwatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll exchanges on an interval and send throttled alerts
    Run(RunArgs),

    /// Run one cycle and print the ranked spreads (no alerts, no state)
    Scan(ScanArgs),

    /// Run diagnostic checks
    #[command(subcommand)]
    Check(CheckCommand),
}

/// Subcommands for `fundwatch check`
#[derive(Subcommand, Debug)]
pub enum CheckCommand {
    /// Validate configuration file
    Config(ConfigPathArg),
}

/// Shared argument for commands that only need a config path.
#[derive(Parser, Debug)]
pub struct ConfigPathArg {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,
}

/// Arguments for the `run` subcommand.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Override log level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Use JSON log format instead of pretty
    #[arg(long)]
    pub json_logs: bool,

    /// Override seconds between poll cycles
    #[arg(long)]
    pub interval: Option<u64>,

    /// Enable Telegram notifications
    #[arg(long)]
    pub telegram_enabled: bool,

    /// Run a single cycle and exit
    #[arg(long)]
    pub once: bool,
}

/// Arguments for the `scan` subcommand.
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Path to configuration file (defaults apply if it does not exist)
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Only show the N widest spreads
    #[arg(short = 'n', long)]
    pub top: Option<usize>,

    /// Print opportunities as JSON
    #[arg(long)]
    pub json: bool,

    /// Log to stderr at this level (debug, info, warn, error)
    #[arg(long)]
    pub log_level: Option<String>,
}
