// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! The runtime talks to a `CommandRunner` instead of spawning processes
//! itself. Tests provide a runner that only records the commands it was
//! asked to run.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;

use super::shell::run_shell;

/// How a triggered command ended.
///
/// The runtime only logs this; a failing command never stops the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// Nonzero exit; `None` when the process was killed by a signal.
    Failed(Option<i32>),
    /// The shell itself could not be started or awaited.
    SpawnFailed(String),
}

impl CommandOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, CommandOutcome::Success)
    }
}

/// Trait abstracting how the triggered command is executed.
///
/// Implementations must not return before the command has finished: the
/// runtime relies on this to never overlap two runs.
pub trait CommandRunner: Send {
    fn run_command<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>>;
}

/// Production runner: `sh -c <command>` (or `cmd /C` on Windows) with
/// inherited stdio.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for ShellRunner {
    fn run_command<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>> {
        Box::pin(run_shell(command))
    }
}
