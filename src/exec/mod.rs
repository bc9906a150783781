// src/exec/mod.rs

//! Process execution layer.
//!
//! Commands built by the task components are dispatched through a
//! [`CommandRunner`], so tests can swap in a recording double while
//! production code spawns real processes.
//!
//! - [`backend`] provides the `CommandRunner` trait, the production
//!   `RealRunner` and the `EchoRunner` used by `--dry-run-commands`.
//! - [`process`] spawns one external process through `sh -c` and maps its
//!   exit status (and Ctrl-C) onto [`crate::errors::CharmError`].

use std::path::PathBuf;

use crate::command::{CommandSpec, quote};

pub mod backend;
pub mod process;

pub use backend::{CommandRunner, EchoRunner, RealRunner};

/// What happens to the child's standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Child inherits stdin/stdout/stderr (progress bars and colours survive).
    Inherit,
    /// Child output is discarded.
    Silent,
}

/// A fully resolved external command: what to run, where, and how.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub spec: CommandSpec,
    pub cwd: PathBuf,
    pub output: OutputMode,
}

impl Invocation {
    pub fn new(spec: CommandSpec, cwd: PathBuf, output: OutputMode) -> Self {
        Self { spec, cwd, output }
    }

    /// Copy-pasteable rendering: `cd <dir> && [ENV=..] <line>`.
    pub fn describe(&self) -> String {
        format!(
            "cd {} && {}",
            quote(&self.cwd.display().to_string()),
            self.spec
        )
    }
}
