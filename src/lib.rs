// src/lib.rs

pub mod cli;
pub mod command;
pub mod config;
pub mod context;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod tasks;
pub mod types;

use std::path::Path;

use tracing::{debug, info};

use crate::cli::{CliArgs, TaskCommand};
use crate::config::{ConfigFile, default_config_path, load_and_validate, load_or_default};
use crate::context::ProjectContext;
use crate::dag::TaskRegistry;
use crate::engine::{Orchestrator, TaskInvocation};
use crate::errors::{CharmError, Result};
use crate::exec::{CommandRunner, EchoRunner, RealRunner};
use crate::fs::{DryRunFileSystem, FileSystem, RealFileSystem};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - repository root + config resolution
/// - the task registry
/// - the orchestrator with a real (or echo-only) command runner
pub async fn run(args: CliArgs) -> Result<()> {
    let fs = RealFileSystem;

    let repo = match &args.repo {
        Some(path) => path.clone(),
        None => std::env::current_dir()?,
    };
    let cfg = load_config(&repo, args.config.as_deref())?;
    let ctx = ProjectContext::resolve(&fs, &repo, &cfg.project.build_dir)?;

    info!(
        repo = %ctx.repo_root().display(),
        build_dir = %ctx.build_dir().display(),
        "project resolved"
    );

    let registry = TaskRegistry::builtin()?;

    let invocation = match args.task {
        Some(TaskCommand::Tasks) => {
            print!("{}", format_tasks(&registry, &cfg)?);
            return Ok(());
        }
        Some(command) => command.into_invocation().ok_or_else(|| {
            CharmError::ConfigError("subcommand is not a runnable task".to_string())
        })?,
        None => default_invocation(&registry)?,
    };

    if args.dry_run_commands {
        run_chain(&ctx, &cfg, &registry, &DryRunFileSystem, EchoRunner, invocation).await
    } else {
        run_chain(&ctx, &cfg, &registry, &fs, RealRunner::new(), invocation).await
    }
}

async fn run_chain<R: CommandRunner>(
    ctx: &ProjectContext,
    cfg: &ConfigFile,
    registry: &TaskRegistry,
    fs: &dyn FileSystem,
    runner: R,
    invocation: TaskInvocation,
) -> Result<()> {
    let mut orchestrator = Orchestrator::new(ctx, cfg, registry, fs, runner);
    let result = orchestrator.invoke(invocation).await;
    debug!(transitions = ?orchestrator.report().transitions(), "task chain finished");
    result
}

/// An explicit `--config` must exist; the implicit `Charm.toml` is optional.
///
/// A relative `--config` is taken relative to the repository.
fn load_config(repo: &Path, config: Option<&Path>) -> Result<ConfigFile> {
    match config {
        Some(path) if path.is_absolute() => load_and_validate(path),
        Some(path) => load_and_validate(repo.join(path)),
        None => load_or_default(default_config_path(repo)),
    }
}

fn default_invocation(registry: &TaskRegistry) -> Result<TaskInvocation> {
    let def = registry
        .default_task()
        .ok_or_else(|| CharmError::ConfigError("no task given and no default task".to_string()))?;
    TaskInvocation::from_name(&def.name)
}

/// Render the registry: name, default marker, prerequisite chain, parameters.
///
/// Default inputs come from the loaded config, so `Charm.toml` overrides show.
fn format_tasks(registry: &TaskRegistry, cfg: &ConfigFile) -> Result<String> {
    use std::fmt::Write as _;

    let mut out = String::from("tasks:\n");
    for task in registry.tasks() {
        let marker = if task.is_default { " (default)" } else { "" };
        let _ = writeln!(out, "  {}{marker} - {}", task.name, task.about);

        let chain: Vec<&str> = registry
            .prerequisites(&task.name)?
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        if !chain.is_empty() {
            let chain = chain.join(" -> ");
            let _ = match task.gate {
                Some(gate) => writeln!(out, "      runs after: {chain} (when {gate})"),
                None => writeln!(out, "      runs after: {chain}"),
            };
        }

        let params: Vec<String> = task.params.iter().map(|p| p.to_string()).collect();
        if !params.is_empty() {
            let _ = writeln!(out, "      params: {}", params.join(", "));
        }

        if let Some(input) = cfg.artifact(&task.name).and_then(|a| a.default_input.as_ref()) {
            let _ = writeln!(out, "      default input: {input}");
        }
    }
    Ok(out)
}
