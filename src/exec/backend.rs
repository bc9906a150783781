// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! Task components never spawn processes themselves; they hand an
//! [`Invocation`] to a `CommandRunner`. Each call resolves only once the
//! external command has finished, which is what keeps a task chain strictly
//! sequential.

use std::future::Future;
use std::pin::Pin;

use tracing::info;

use crate::errors::Result;
use crate::exec::Invocation;
use crate::exec::process::run_process;

/// Trait abstracting how external commands are executed.
///
/// Production code uses [`RealRunner`]; tests provide an implementation that
/// records invocations instead of spawning processes.
pub trait CommandRunner: Send {
    /// Run the invocation to completion.
    ///
    /// Must return `CharmError::ExternalTool` with the tool's exit code when
    /// the command fails.
    fn run(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Runner that spawns real processes.
#[derive(Debug, Default)]
pub struct RealRunner;

impl RealRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for RealRunner {
    fn run(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move { run_process(&invocation).await })
    }
}

/// Runner that prints each command instead of executing it.
#[derive(Debug, Default)]
pub struct EchoRunner;

impl CommandRunner for EchoRunner {
    fn run(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(cmd = %invocation.spec.to_shell_line(), "dry-run: not executing");
            println!("{}", invocation.describe());
            Ok(())
        })
    }
}
