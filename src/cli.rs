// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! Two subcommands, matching the tool's surface:
//! - `init`: write a default config file (refuses to overwrite without `--force`)
//! - `watch`: start the watch/rebuild/restart loop

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `remon`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "remon",
    version,
    about = "Watch directories and rebuild/restart a managed process on change.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Remon.toml` in the current working directory.
    #[arg(long, value_name = "PATH", default_value = "Remon.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `REMON_LOG`, then the config file's `log_level`, then
    /// `info` are used in that order.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Write a default config file at the config path.
    Init {
        /// Overwrite an existing config file.
        #[arg(long)]
        force: bool,
    },
    /// Watch the configured include paths and restart the managed process
    /// on qualifying changes.
    Watch,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
