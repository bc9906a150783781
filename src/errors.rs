// src/errors.rs

//! Crate-wide error type and helpers.

use std::path::PathBuf;

use thiserror::Error;

/// Exit code used when the chain was interrupted (SIGINT convention).
pub const EXIT_INTERRUPTED: i32 = 130;

#[derive(Error, Debug)]
pub enum CharmError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Repository root does not exist: {0}")]
    RepoRootMissing(PathBuf),

    #[error("command `{command}` failed with exit code {code}")]
    ExternalTool { command: String, code: i32 },

    #[error("command `{command}` was interrupted")]
    Interrupted { command: String },

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Cycle detected in task graph: {0}")]
    DagCycle(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CharmError {
    /// Process exit code that should be reported for this error.
    ///
    /// External tool failures keep the tool's own code so that `charm`
    /// behaves like the last command it ran.
    pub fn exit_code(&self) -> i32 {
        match self {
            CharmError::ExternalTool { code, .. } if *code != 0 => *code,
            CharmError::Interrupted { .. } => EXIT_INTERRUPTED,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, CharmError>;
