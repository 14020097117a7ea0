// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The classic invocation is purely positional:
//! `ifchanged <path1> [path2 ... pathN] <command>`. The last positional
//! argument is the command, everything before it is the watch set.

use std::ffi::OsString;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::engine::DEFAULT_INTERVAL;
use crate::errors::{IfChangedError, Result};

/// Usage line printed when too few positional arguments are given.
pub const USAGE: &str = "usage: ifchanged file1 .. filen command";

/// Command-line arguments for `ifchanged`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ifchanged",
    version,
    about = "Rerun a command whenever the newest modification time under the watched paths changes.",
    override_usage = "ifchanged [OPTIONS] <PATH>... <COMMAND>",
    long_about = None
)]
pub struct CliArgs {
    /// Poll interval in milliseconds.
    #[arg(
        long,
        value_name = "MS",
        default_value_t = DEFAULT_INTERVAL.as_millis() as u64,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_ms: u64,

    /// Run a single poll cycle and exit.
    #[arg(long)]
    pub once: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `IFCHANGED_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Files or directories to watch, followed by the command to run.
    #[arg(
        value_name = "PATH... COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub args: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Positional arguments split into the watch set and the command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchSpec {
    pub paths: Vec<PathBuf>,
    pub command: String,
}

impl CliArgs {
    /// Split the positional arguments; at least one path and a command are
    /// required.
    pub fn watch_spec(&self) -> Result<WatchSpec> {
        match self.args.split_last() {
            Some((command, paths)) if !paths.is_empty() => Ok(WatchSpec {
                paths: paths.iter().map(PathBuf::from).collect(),
                command: command.clone(),
            }),
            _ => Err(IfChangedError::Usage(USAGE.to_string())),
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Parse from the process arguments without exiting on failure.
pub fn try_parse() -> std::result::Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}

/// Parse from an explicit iterator (tests).
pub fn try_parse_from<I, T>(iter: I) -> std::result::Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(iter)
}
