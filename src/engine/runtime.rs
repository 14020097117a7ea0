// src/engine/runtime.rs

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use tracing::{debug, error, info, trace};

use crate::errors::Result;
use crate::exec::{CommandOutcome, CommandRunner};
use crate::fs::FileSystem;
use crate::watch::{scan, Change, WatchState};

use super::{PollOutcome, RunSummary, RuntimeOptions, ShutdownSignal, DONE_LINE};

/// Drives the poll loop and delegates command execution to a
/// `CommandRunner`.
///
/// Exactly one command runs at a time: a poll cycle does not finish until
/// the command it triggered has returned.
pub struct Runtime<R: CommandRunner> {
    fs: Arc<dyn FileSystem>,
    state: WatchState,
    runner: R,
    options: RuntimeOptions,
    output: Box<dyn Write + Send>,
}

impl<R: CommandRunner> fmt::Debug for Runtime<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("fs", &self.fs)
            .field("state", &self.state)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<R: CommandRunner> Runtime<R> {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        state: WatchState,
        runner: R,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            fs,
            state,
            runner,
            options,
            output: Box::new(std::io::stdout()),
        }
    }

    /// Write the completion line somewhere other than stdout.
    pub fn with_output(mut self, output: Box<dyn Write + Send>) -> Self {
        self.output = output;
        self
    }

    pub fn state(&self) -> &WatchState {
        &self.state
    }

    /// Main loop.
    ///
    /// Each cycle waits `options.interval`, then runs [`Runtime::poll_once`].
    /// Shutdown is honoured during the wait; a running command is always
    /// allowed to finish.
    pub async fn run(mut self, mut shutdown: ShutdownSignal) -> Result<RunSummary> {
        info!(
            paths = ?self.state.paths(),
            command = %self.state.command(),
            interval_ms = self.options.interval.as_millis() as u64,
            "ifchanged runtime started"
        );

        let mut summary = RunSummary::default();

        loop {
            if self
                .options
                .max_cycles
                .is_some_and(|max| summary.cycles >= max)
            {
                info!(cycles = summary.cycles, "cycle limit reached; stopping runtime");
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.wait() => {
                    info!("shutdown requested; stopping runtime");
                    break;
                }
                _ = tokio::time::sleep(self.options.interval) => {}
            }

            summary.cycles += 1;
            if self.poll_once().await?.triggered() {
                summary.triggers += 1;
            }
        }

        info!(
            cycles = summary.cycles,
            triggers = summary.triggers,
            "runtime exiting"
        );
        Ok(summary)
    }

    /// One scan-compare-maybe-trigger step, without waiting.
    pub async fn poll_once(&mut self) -> Result<PollOutcome> {
        // The walk is blocking IO; keep it off the async worker.
        let fs = Arc::clone(&self.fs);
        let paths = self.state.paths().to_vec();
        let candidate = tokio::task::spawn_blocking(move || scan(fs.as_ref(), &paths))
            .await
            .map_err(anyhow::Error::from)?;

        let (previous, current) = match self.state.observe(candidate) {
            Change::Unchanged => {
                trace!(current = %candidate, "no change");
                return Ok(PollOutcome::Unchanged);
            }
            Change::Changed { previous, current } => (previous, current),
        };

        info!(%previous, %current, "change detected; running command");

        let outcome = match self.runner.run_command(self.state.command()).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(command = %self.state.command(), error = %err, "command could not be run");
                CommandOutcome::SpawnFailed(err.to_string())
            }
        };
        debug!(?outcome, "command finished");

        writeln!(self.output, "{DONE_LINE}")?;
        self.output.flush()?;

        self.state.commit(current);

        Ok(PollOutcome::Triggered {
            previous,
            current,
            outcome,
        })
    }
}
