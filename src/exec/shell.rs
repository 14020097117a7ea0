// src/exec/shell.rs

//! Shell process runner.

use anyhow::Context;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::{IfChangedError, Result};

use super::backend::CommandOutcome;

/// Build a shell command appropriate for the platform.
///
/// The command string is handed to the shell verbatim.
pub fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Run `command` through the shell and wait for it.
///
/// Stdout and stderr are inherited so the command reports its own output
/// and failures.
pub async fn run_shell(command: &str) -> Result<CommandOutcome> {
    info!(command = %command, "starting command");

    let mut child = shell_command(command)
        .kill_on_drop(true)
        .spawn()
        .with_context(|| format!("spawning shell for command '{command}'"))
        .map_err(|e| IfChangedError::CommandError(format!("{e:#}")))?;

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for command '{command}'"))
        .map_err(|e| IfChangedError::CommandError(format!("{e:#}")))?;

    let outcome = if status.success() {
        CommandOutcome::Success
    } else {
        CommandOutcome::Failed(status.code())
    };

    match &outcome {
        CommandOutcome::Success => debug!(command = %command, "command exited successfully"),
        other => warn!(command = %command, outcome = ?other, "command exited unsuccessfully"),
    }

    Ok(outcome)
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reports_success_and_exit_code() {
        assert_eq!(run_shell("true").await.unwrap(), CommandOutcome::Success);
        assert_eq!(
            run_shell("exit 3").await.unwrap(),
            CommandOutcome::Failed(Some(3))
        );
    }

    #[tokio::test]
    async fn command_string_goes_through_the_shell() {
        let dir = tempfile::tempdir().unwrap();
        let marker = dir.path().join("marker");
        let cmd = format!("echo one > '{}' && echo two >> '{}'", marker.display(), marker.display());

        assert!(run_shell(&cmd).await.unwrap().is_success());
        let contents = std::fs::read_to_string(&marker).unwrap();
        assert_eq!(contents, "one\ntwo\n");
    }
}
