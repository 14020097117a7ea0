use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use ifchanged::errors::{IfChangedError, Result};
use ifchanged::exec::{CommandOutcome, CommandRunner};

/// A fake runner that:
/// - records which commands were "run"
/// - immediately reports the configured outcome (default `Success`).
#[derive(Debug, Clone, Default)]
pub struct FakeRunner {
    executed: Arc<Mutex<Vec<String>>>,
    outcome: Option<CommandOutcome>,
    fail_to_spawn: bool,
}

impl FakeRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report this outcome for every command.
    pub fn with_outcome(mut self, outcome: CommandOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Return an error instead of an outcome, as if the shell were missing.
    pub fn failing_to_spawn(mut self) -> Self {
        self.fail_to_spawn = true;
        self
    }

    /// Shared handle to the list of executed commands.
    pub fn executed(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.executed)
    }

    pub fn count(&self) -> usize {
        self.executed.lock().unwrap().len()
    }
}

impl CommandRunner for FakeRunner {
    fn run_command<'a>(
        &'a mut self,
        command: &'a str,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>> {
        Box::pin(async move {
            self.executed.lock().unwrap().push(command.to_string());
            if self.fail_to_spawn {
                return Err(IfChangedError::CommandError(format!(
                    "spawning shell for command '{command}': not found"
                )));
            }
            Ok(self.outcome.clone().unwrap_or(CommandOutcome::Success))
        })
    }
}
