// src/engine/mod.rs

//! Polling engine for ifchanged.
//!
//! The [`runtime`] owns the watch state and loops:
//! wait the poll interval, scan, compare, and run the command on change.
//! It stops when the [`ShutdownSignal`] fires or after
//! [`RuntimeOptions::max_cycles`] poll cycles.

use std::time::Duration;

use tokio::sync::watch;

use crate::exec::CommandOutcome;
use crate::watch::Timestamp;

/// Default poll interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// Line written to stdout after each triggered command completes.
pub const DONE_LINE: &str = "@@@ done.";

/// Runtime options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    /// Time to wait before each scan.
    pub interval: Duration,
    /// Stop after this many poll cycles (`--once` uses 1). `None` runs until
    /// shutdown.
    pub max_cycles: Option<u64>,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            max_cycles: None,
        }
    }
}

/// Outcome of a single poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    Unchanged,
    Triggered {
        previous: Timestamp,
        current: Timestamp,
        outcome: CommandOutcome,
    },
}

impl PollOutcome {
    pub fn triggered(&self) -> bool {
        matches!(self, PollOutcome::Triggered { .. })
    }
}

/// Counters returned when the loop stops.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub cycles: u64,
    pub triggers: u64,
}

/// Sending half of the stop signal.
#[derive(Debug)]
pub struct ShutdownTrigger(watch::Sender<bool>);

/// Receiving half of the stop signal, handed to [`Runtime::run`].
#[derive(Debug, Clone)]
pub struct ShutdownSignal(watch::Receiver<bool>);

/// Create a connected trigger/signal pair.
pub fn shutdown_channel() -> (ShutdownTrigger, ShutdownSignal) {
    let (tx, rx) = watch::channel(false);
    (ShutdownTrigger(tx), ShutdownSignal(rx))
}

impl ShutdownTrigger {
    pub fn shutdown(&self) {
        self.0.send_replace(true);
    }
}

impl ShutdownSignal {
    pub fn is_shutdown(&self) -> bool {
        *self.0.borrow()
    }

    /// Resolve once shutdown is requested. If the trigger is dropped without
    /// firing, this never resolves.
    pub async fn wait(&mut self) {
        loop {
            if *self.0.borrow_and_update() {
                return;
            }
            if self.0.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

pub mod runtime;

pub use runtime::Runtime;
