// src/engine/mod.rs

//! Orchestration engine.
//!
//! A [`TaskInvocation`] names one task plus its options. The
//! [`Orchestrator`] resolves its prerequisite from the
//! [`crate::dag::TaskRegistry`], runs the chain strictly in sequence, and
//! records every state transition in a [`TaskReport`].

pub mod orchestrator;
pub mod report;

pub use orchestrator::Orchestrator;
pub use report::{TaskReport, TaskTransition};

use crate::errors::{CharmError, Result};
use crate::tasks::{LaunchFlag, LaunchRequest};
use crate::types::{Executor, Generator};

/// Canonical task name type used throughout the engine.
pub type TaskName = String;

/// One task to run, with its options resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskInvocation {
    Clean {
        dry_run: bool,
    },
    Setup {
        clean: bool,
    },
    /// `None` uses the configured generator (`configure` task).
    Configure {
        generator: Option<Generator>,
    },
    /// `None` uses the configured executor (`build` task).
    Build {
        executor: Option<Executor>,
        target: Option<String>,
    },
    /// `task` is the registry name the launch was requested through
    /// (`rbot`, `shmvideo` or `run`).
    Launch {
        task: TaskName,
        request: LaunchRequest,
    },
}

impl TaskInvocation {
    /// Invocation of `name` with every option at its default.
    pub fn from_name(name: &str) -> Result<Self> {
        let invocation = match name {
            "clean" => TaskInvocation::Clean { dry_run: false },
            "setup" => TaskInvocation::Setup { clean: true },
            "configure" => TaskInvocation::Configure { generator: None },
            "cmake" => TaskInvocation::Configure {
                generator: Some(Generator::Cmake),
            },
            "meson" => TaskInvocation::Configure {
                generator: Some(Generator::Meson),
            },
            "build" => TaskInvocation::Build {
                executor: None,
                target: None,
            },
            "make" => TaskInvocation::Build {
                executor: Some(Executor::Make),
                target: None,
            },
            "ninja" => TaskInvocation::Build {
                executor: Some(Executor::Ninja),
                target: None,
            },
            "rbot" | "shmvideo" => TaskInvocation::Launch {
                task: name.to_string(),
                request: LaunchRequest::new(name),
            },
            "run" => {
                return Err(CharmError::ConfigError(
                    "task 'run' needs an artifact name".to_string(),
                ));
            }
            other => return Err(CharmError::TaskNotFound(other.to_string())),
        };
        Ok(invocation)
    }

    pub fn name(&self) -> &str {
        match self {
            TaskInvocation::Clean { .. } => "clean",
            TaskInvocation::Setup { .. } => "setup",
            TaskInvocation::Configure { generator: None } => "configure",
            TaskInvocation::Configure {
                generator: Some(g),
            } => g.program(),
            TaskInvocation::Build { executor: None, .. } => "build",
            TaskInvocation::Build {
                executor: Some(e), ..
            } => e.program(),
            TaskInvocation::Launch { task, .. } => task.as_str(),
        }
    }

    /// Current value of the boolean parameter `param`, if this task has one.
    ///
    /// The orchestrator reads a task's gate through this, so the registry's
    /// `gate` names decide which option switches a prerequisite off.
    pub fn flag(&self, param: &str) -> Option<bool> {
        match (self, param) {
            (TaskInvocation::Clean { dry_run }, "dry_run") => Some(*dry_run),
            (TaskInvocation::Setup { clean }, "clean") => Some(*clean),
            (TaskInvocation::Launch { task, request }, gate)
                if (task == "run" && gate == "build") || (task != "run" && gate == "ninja") =>
            {
                Some(request.rebuild_first)
            }
            (TaskInvocation::Launch { request, .. }, "shm") => {
                Some(request.flags.contains(&LaunchFlag::ShmVideo))
            }
            (TaskInvocation::Launch { request, .. }, "gen_object_templates") => {
                Some(request.flags.contains(&LaunchFlag::GenerateObjectTemplates))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip_through_from_name() {
        for name in [
            "clean", "setup", "configure", "cmake", "meson", "build", "make", "ninja", "rbot",
            "shmvideo",
        ] {
            assert_eq!(TaskInvocation::from_name(name).unwrap().name(), name);
        }
    }

    #[test]
    fn run_needs_an_artifact() {
        assert!(TaskInvocation::from_name("run").is_err());
        assert!(matches!(
            TaskInvocation::from_name("deploy"),
            Err(CharmError::TaskNotFound(_))
        ));
    }

    #[test]
    fn flags_follow_options() {
        assert_eq!(TaskInvocation::Setup { clean: false }.flag("clean"), Some(false));
        assert_eq!(TaskInvocation::Clean { dry_run: true }.flag("dry_run"), Some(true));

        let launch = TaskInvocation::Launch {
            task: "rbot".into(),
            request: LaunchRequest::new("rbot")
                .rebuild_first(false)
                .with_flag(LaunchFlag::ShmVideo),
        };
        assert_eq!(launch.flag("ninja"), Some(false));
        assert_eq!(launch.flag("shm"), Some(true));
        assert_eq!(launch.flag("gen_object_templates"), Some(false));
        assert_eq!(launch.flag("build"), None);

        let run = TaskInvocation::Launch {
            task: "run".into(),
            request: LaunchRequest::new("viewer"),
        };
        assert_eq!(run.flag("build"), Some(true));
        assert_eq!(run.flag("ninja"), None);
    }

    #[test]
    fn builtin_gates_resolve_to_flags() {
        let registry = crate::dag::TaskRegistry::builtin().unwrap();
        for def in registry.tasks() {
            let (Some(gate), Ok(invocation)) = (def.gate, TaskInvocation::from_name(&def.name))
            else {
                continue;
            };
            assert!(invocation.flag(gate).is_some(), "{} gate {gate}", def.name);
        }
    }
}
