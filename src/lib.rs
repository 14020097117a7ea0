// src/lib.rs

pub mod cli;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod watch;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::engine::{shutdown_channel, Runtime, RuntimeOptions};
use crate::errors::Result;
use crate::exec::ShellRunner;
use crate::fs::RealFileSystem;
use crate::watch::WatchState;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - watch set + command from the positional arguments
/// - the shell runner
/// - Ctrl-C handling
/// - the polling runtime
pub async fn run(args: CliArgs) -> Result<()> {
    let spec = args.watch_spec()?;
    let options = runtime_options(&args);
    debug!(?spec, ?options, "starting ifchanged");

    let state = WatchState::new(spec.paths, spec.command);
    let (trigger, signal) = shutdown_channel();

    // Ctrl-C → stop polling.
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        trigger.shutdown();
    });

    let runtime = Runtime::new(Arc::new(RealFileSystem), state, ShellRunner::new(), options);
    let summary = runtime.run(signal).await?;
    info!(?summary, "ifchanged stopped");
    Ok(())
}

/// Map CLI flags onto runtime options.
pub fn runtime_options(args: &CliArgs) -> RuntimeOptions {
    RuntimeOptions {
        interval: args.interval(),
        max_cycles: args.once.then_some(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_match_runtime_defaults() {
        let args = cli::try_parse_from(["ifchanged", "src", "make"]).unwrap();
        assert_eq!(runtime_options(&args), RuntimeOptions::default());
    }

    #[test]
    fn once_limits_to_a_single_cycle() {
        let args = cli::try_parse_from(["ifchanged", "--once", "src", "make"]).unwrap();
        assert_eq!(runtime_options(&args).max_cycles, Some(1));
    }
}
