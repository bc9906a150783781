// src/engine/orchestrator.rs

//! Sequential task-chain execution.

use tracing::{debug, error, info, warn};

use crate::config::ConfigFile;
use crate::context::ProjectContext;
use crate::dag::{TaskRegistry, TaskRunState};
use crate::engine::{TaskInvocation, TaskReport};
use crate::errors::{CharmError, Result};
use crate::exec::CommandRunner;
use crate::fs::FileSystem;
use crate::tasks::{
    BuildConfigurator, BuildExecutor, Cleaner, DependencyInstaller, LaunchRequest, Launcher,
    available_jobs,
};
use crate::types::{Executor, Generator};

/// Runs one task chain against a project.
///
/// Everything is strictly sequential: each external command is awaited to
/// completion before the next one is issued, and the first failure aborts
/// the rest of the chain.
pub struct Orchestrator<'a, R: CommandRunner> {
    ctx: &'a ProjectContext,
    cfg: &'a ConfigFile,
    registry: &'a TaskRegistry,
    fs: &'a dyn FileSystem,
    runner: R,
    jobs: Option<usize>,
    report: TaskReport,
}

impl<'a, R: CommandRunner> Orchestrator<'a, R> {
    /// The job count comes from `[build].jobs`, else from the host's
    /// processing units.
    pub fn new(
        ctx: &'a ProjectContext,
        cfg: &'a ConfigFile,
        registry: &'a TaskRegistry,
        fs: &'a dyn FileSystem,
        runner: R,
    ) -> Self {
        let jobs = cfg.build.jobs.or_else(available_jobs);
        Self {
            ctx,
            cfg,
            registry,
            fs,
            runner,
            jobs,
            report: TaskReport::default(),
        }
    }

    /// Override the build job count (`None` omits `-j`).
    pub fn with_jobs(mut self, jobs: Option<usize>) -> Self {
        self.jobs = jobs;
        self
    }

    pub fn report(&self) -> &TaskReport {
        &self.report
    }

    /// Prerequisites first, `task` last. Disabled gates cut the chain.
    pub fn plan(&self, task: TaskInvocation) -> Result<Vec<TaskInvocation>> {
        let mut chain = vec![task];

        loop {
            let next = {
                let current = &chain[chain.len() - 1];
                let def = self.registry.get(current.name())?;
                match &def.depends_on {
                    Some(dep) if self.gate_open(current, def.gate)? => {
                        Some(self.prerequisite_for(current, dep)?)
                    }
                    Some(dep) => {
                        debug!(task = %def.name, prerequisite = %dep, "prerequisite disabled");
                        None
                    }
                    None => None,
                }
            };

            match next {
                Some(prerequisite) => chain.push(prerequisite),
                None => break,
            }
        }

        chain.reverse();
        Ok(chain)
    }

    /// Run `task` and its enabled prerequisites.
    pub async fn invoke(&mut self, task: TaskInvocation) -> Result<()> {
        let chain = self.plan(task)?;
        let names: Vec<String> = chain.iter().map(|t| t.name().to_string()).collect();

        for name in &names {
            self.transition(name, TaskRunState::Pending);
        }

        for (index, task) in chain.into_iter().enumerate() {
            let name = &names[index];
            self.transition(name, TaskRunState::Running);

            if let Err(err) = self.execute(task).await {
                error!(task = %name, error = %err, "task failed");
                self.transition(name, TaskRunState::Failed);

                for blocked in &names[index + 1..] {
                    warn!(
                        task = %blocked,
                        prerequisite = %name,
                        "not running; prerequisite failed"
                    );
                    self.transition(blocked, TaskRunState::Failed);
                }
                return Err(err);
            }

            self.transition(name, TaskRunState::Succeeded);
        }

        debug_assert!(names.iter().all(|n| {
            self.report
                .state_of(n)
                .is_some_and(TaskRunState::is_terminal)
        }));
        Ok(())
    }

    fn transition(&mut self, task: &str, state: TaskRunState) {
        match state {
            TaskRunState::Pending => debug!(task, "pending"),
            TaskRunState::Running => info!(task, "running"),
            TaskRunState::Succeeded => info!(task, "succeeded"),
            TaskRunState::Failed => warn!(task, "failed"),
        }
        self.report.record(task, state);
    }

    /// An ungated prerequisite always runs; otherwise the gate flag decides.
    fn gate_open(&self, task: &TaskInvocation, gate: Option<&str>) -> Result<bool> {
        match gate {
            None => Ok(true),
            Some(gate) => task.flag(gate).ok_or_else(|| {
                CharmError::ConfigError(format!(
                    "task '{}' has no flag '{gate}' to gate its prerequisite",
                    task.name()
                ))
            }),
        }
    }

    fn prerequisite_for(&self, task: &TaskInvocation, dep: &str) -> Result<TaskInvocation> {
        let mut prerequisite = TaskInvocation::from_name(dep)?;

        // A launch only needs its own artifact rebuilt.
        if let (
            TaskInvocation::Launch { request, .. },
            TaskInvocation::Build { target, .. },
        ) = (task, &mut prerequisite)
        {
            *target = Some(self.launcher().build_target(&request.artifact)?);
        }

        Ok(prerequisite)
    }

    async fn execute(&mut self, task: TaskInvocation) -> Result<()> {
        match task {
            TaskInvocation::Clean { dry_run } => self.clean(dry_run),
            TaskInvocation::Setup { .. } => self.setup().await,
            TaskInvocation::Configure { generator } => self.configure(generator).await,
            TaskInvocation::Build { executor, target } => {
                self.build(executor, target.as_deref()).await
            }
            TaskInvocation::Launch { request, .. } => self.launch(&request).await,
        }
    }

    fn launcher(&self) -> Launcher<'a> {
        let cfg: &'a ConfigFile = self.cfg;
        Launcher::new(self.ctx, &cfg.launch, &cfg.artifact)
    }

    fn clean(&mut self, dry_run: bool) -> Result<()> {
        let summary = Cleaner::new(self.ctx, &self.cfg.clean).clean(self.fs, dry_run)?;
        info!(removed = summary.removed.len(), dry_run, "clean finished");
        Ok(())
    }

    /// Install, then configure. Configure is reported as its own task.
    async fn setup(&mut self) -> Result<()> {
        let install = DependencyInstaller::new(self.ctx, &self.cfg.setup).invocation()?;
        info!(
            packages = self.cfg.setup.packages.len(),
            "installing system packages"
        );
        self.runner.run(install).await?;

        self.transition("configure", TaskRunState::Pending);
        self.transition("configure", TaskRunState::Running);
        match self.configure(None).await {
            Ok(()) => {
                self.transition("configure", TaskRunState::Succeeded);
                Ok(())
            }
            Err(err) => {
                self.transition("configure", TaskRunState::Failed);
                Err(err)
            }
        }
    }

    async fn configure(&mut self, generator: Option<Generator>) -> Result<()> {
        self.ctx.ensure_build_dir(self.fs)?;
        let invocation =
            BuildConfigurator::new(self.ctx, &self.cfg.configure, self.cfg.build.executor)
                .invocation(generator, self.fs);
        self.runner.run(invocation).await
    }

    async fn build(&mut self, executor: Option<Executor>, target: Option<&str>) -> Result<()> {
        self.ctx.ensure_build_dir(self.fs)?;
        let executor = executor.unwrap_or(self.cfg.build.executor);
        let invocation = BuildExecutor::new(self.ctx, executor, self.jobs).invocation(target);
        self.runner.run(invocation).await
    }

    async fn launch(&mut self, request: &LaunchRequest) -> Result<()> {
        let invocation = self.launcher().invocation(request)?;
        self.runner.run(invocation).await
    }
}
