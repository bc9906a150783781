// src/tasks/build.rs

use tracing::warn;

use crate::command::CommandSpec;
use crate::context::ProjectContext;
use crate::exec::Invocation;
use crate::types::Executor;

/// Number of processing units on this host, if it can be determined.
///
/// Failure is not an error: the build just runs without `-j`.
pub fn available_jobs() -> Option<usize> {
    match std::thread::available_parallelism() {
        Ok(n) => Some(n.get()),
        Err(e) => {
            warn!(error = %e, "could not determine processing units; building without -j");
            None
        }
    }
}

/// Runs make or ninja inside the build directory.
#[derive(Debug)]
pub struct BuildExecutor<'a> {
    ctx: &'a ProjectContext,
    executor: Executor,
    jobs: Option<usize>,
}

impl<'a> BuildExecutor<'a> {
    pub fn new(ctx: &'a ProjectContext, executor: Executor, jobs: Option<usize>) -> Self {
        Self { ctx, executor, jobs }
    }

    /// `<executor> [-j<N>] [target]`.
    pub fn command(&self, target: Option<&str>) -> CommandSpec {
        let mut spec = CommandSpec::new(self.executor.program());
        if let Some(jobs) = self.jobs {
            spec = spec.arg(format!("-j{jobs}"));
        }
        if let Some(target) = target {
            spec = spec.arg(target);
        }
        spec
    }

    /// Pass-through terminal output so progress and colours survive.
    pub fn invocation(&self, target: Option<&str>) -> Invocation {
        self.ctx.at_build_dir().command(self.command(target))
    }
}
