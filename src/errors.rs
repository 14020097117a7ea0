// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum IfChangedError {
    #[error("{0}")]
    Usage(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Command error: {0}")]
    CommandError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, IfChangedError>;
