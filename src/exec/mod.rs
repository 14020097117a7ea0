// src/exec/mod.rs

//! Command execution layer.
//!
//! - [`shell`] builds and runs the platform shell command with
//!   `tokio::process::Command`.
//! - [`backend`] provides the `CommandRunner` trait and the concrete
//!   `ShellRunner` that the runtime uses in production, and which tests can
//!   replace with a fake implementation.

pub mod backend;
pub mod shell;

pub use backend::{CommandOutcome, CommandRunner, ShellRunner};
pub use shell::run_shell;
