// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::command::env::parse_assignment;
use crate::engine::TaskInvocation;
use crate::tasks::{LaunchFlag, LaunchRequest, parse_z_distance};
use crate::types::{Executor, Generator};

/// Command-line arguments for `charm`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "charm",
    version,
    about = "Set up, configure, build and launch the native project.",
    long_about = None
)]
pub struct CliArgs {
    /// Repository root. Default: the current working directory.
    #[arg(long, global = true, value_name = "PATH")]
    pub repo: Option<PathBuf>,

    /// Project config (TOML). Default: `Charm.toml` in the repository root.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `CHARM_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print every command instead of executing it.
    #[arg(long, global = true)]
    pub dry_run_commands: bool,

    /// Task to run. Default: `build`.
    #[command(subcommand)]
    pub task: Option<TaskCommand>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum TaskCommand {
    /// Remove build artifacts.
    Clean {
        /// Only report what would be removed.
        #[arg(long)]
        dry_run: bool,
    },
    /// Clean, install system packages, then configure.
    Setup {
        /// Keep the existing build directory.
        #[arg(long)]
        no_clean: bool,
    },
    /// Run the configured generator in the build directory.
    Configure,
    /// Configure with cmake.
    Cmake,
    /// Configure with meson.
    Meson,
    /// Run the configured build executor.
    Build {
        /// Build only this target.
        target: Option<String>,
    },
    /// Build with make.
    Make { target: Option<String> },
    /// Build with ninja.
    Ninja { target: Option<String> },
    /// Build and launch rbot.
    Rbot {
        /// Object file. Default: `objects/box.obj` in the repository.
        object: Option<String>,
        /// Read video from shared memory (see `shmvideo`).
        #[arg(long)]
        shm: bool,
        /// Launch without rebuilding first.
        #[arg(long)]
        no_ninja: bool,
        #[arg(long)]
        gen_object_templates: bool,
        /// Initial z-distance of the object.
        #[arg(long, value_name = "DIST", value_parser = parse_z_distance)]
        z_distance: Option<String>,
        /// Camera device.
        #[arg(long, value_name = "PATH")]
        device: Option<PathBuf>,
        /// Extra environment for the launched program.
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        env: Vec<(String, String)>,
    },
    /// Build and launch shmvideo.
    Shmvideo {
        #[arg(long)]
        no_ninja: bool,
        #[arg(long, value_name = "PATH")]
        device: Option<PathBuf>,
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        env: Vec<(String, String)>,
    },
    /// Build and launch any configured artifact.
    Run {
        artifact: String,
        /// Positional input. Default: the artifact's `default_input`.
        input: Option<String>,
        #[arg(long)]
        no_build: bool,
        /// Discard the program's output.
        #[arg(long)]
        quiet: bool,
        #[arg(long = "env", value_name = "KEY=VALUE", value_parser = parse_assignment)]
        env: Vec<(String, String)>,
    },
    /// List the available tasks.
    Tasks,
}

impl TaskCommand {
    /// Map the parsed subcommand onto an engine invocation.
    ///
    /// `None` for commands that are not tasks (`tasks`).
    pub fn into_invocation(self) -> Option<TaskInvocation> {
        let invocation = match self {
            TaskCommand::Clean { dry_run } => TaskInvocation::Clean { dry_run },
            TaskCommand::Setup { no_clean } => TaskInvocation::Setup { clean: !no_clean },
            TaskCommand::Configure => TaskInvocation::Configure { generator: None },
            TaskCommand::Cmake => TaskInvocation::Configure {
                generator: Some(Generator::Cmake),
            },
            TaskCommand::Meson => TaskInvocation::Configure {
                generator: Some(Generator::Meson),
            },
            TaskCommand::Build { target } => TaskInvocation::Build {
                executor: None,
                target,
            },
            TaskCommand::Make { target } => TaskInvocation::Build {
                executor: Some(Executor::Make),
                target,
            },
            TaskCommand::Ninja { target } => TaskInvocation::Build {
                executor: Some(Executor::Ninja),
                target,
            },
            TaskCommand::Rbot {
                object,
                shm,
                no_ninja,
                gen_object_templates,
                z_distance,
                device,
                env,
            } => {
                let mut request = LaunchRequest::new("rbot").rebuild_first(!no_ninja);
                request.input = object;
                if shm {
                    request.flags.insert(LaunchFlag::ShmVideo);
                }
                if gen_object_templates {
                    request.flags.insert(LaunchFlag::GenerateObjectTemplates);
                }
                if let Some(distance) = z_distance {
                    request.flags.insert(LaunchFlag::ZDistance(distance));
                }
                if let Some(device) = device {
                    request.flags.insert(LaunchFlag::Device(device));
                }
                request.extra_env.extend(env);
                TaskInvocation::Launch {
                    task: "rbot".to_string(),
                    request,
                }
            }
            TaskCommand::Shmvideo {
                no_ninja,
                device,
                env,
            } => {
                let mut request = LaunchRequest::new("shmvideo").rebuild_first(!no_ninja);
                if let Some(device) = device {
                    request.flags.insert(LaunchFlag::Device(device));
                }
                request.extra_env.extend(env);
                TaskInvocation::Launch {
                    task: "shmvideo".to_string(),
                    request,
                }
            }
            TaskCommand::Run {
                artifact,
                input,
                no_build,
                quiet,
                env,
            } => {
                let mut request = LaunchRequest::new(artifact).rebuild_first(!no_build);
                request.input = input;
                request.extra_env.extend(env);
                if quiet {
                    request = request.silenced();
                }
                TaskInvocation::Launch {
                    task: "run".to_string(),
                    request,
                }
            }
            TaskCommand::Tasks => return None,
        };
        Some(invocation)
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::OutputMode;

    fn invocation(argv: &[&str]) -> Option<TaskInvocation> {
        let args = CliArgs::try_parse_from(argv).unwrap();
        args.task.and_then(TaskCommand::into_invocation)
    }

    #[test]
    fn no_subcommand_means_default_task() {
        let args = CliArgs::try_parse_from(["charm"]).unwrap();
        assert!(args.task.is_none());
    }

    #[test]
    fn setup_cleans_unless_told_otherwise() {
        assert_eq!(
            invocation(&["charm", "setup"]),
            Some(TaskInvocation::Setup { clean: true })
        );
        assert_eq!(
            invocation(&["charm", "setup", "--no-clean"]),
            Some(TaskInvocation::Setup { clean: false })
        );
    }

    #[test]
    fn rbot_options_map_to_request() {
        let Some(TaskInvocation::Launch { task, request }) = invocation(&[
            "charm",
            "rbot",
            "objects/cup.obj",
            "--shm",
            "--no-ninja",
            "--env",
            "QT_QPA_PLATFORM=xcb",
        ]) else {
            panic!("expected a launch");
        };

        assert_eq!(task, "rbot");
        assert_eq!(request.input.as_deref(), Some("objects/cup.obj"));
        assert!(request.flags.contains(&LaunchFlag::ShmVideo));
        assert!(!request.rebuild_first);
        assert_eq!(request.extra_env["QT_QPA_PLATFORM"], "xcb");
    }

    #[test]
    fn ninja_target_is_optional() {
        assert_eq!(
            invocation(&["charm", "ninja", "rbot"]),
            Some(TaskInvocation::Build {
                executor: Some(Executor::Ninja),
                target: Some("rbot".into()),
            })
        );
        assert_eq!(
            invocation(&["charm", "make"]),
            Some(TaskInvocation::Build {
                executor: Some(Executor::Make),
                target: None,
            })
        );
    }

    #[test]
    fn run_quiet_silences_output() {
        let Some(TaskInvocation::Launch { request, .. }) =
            invocation(&["charm", "run", "shmvideo", "--quiet", "--no-build"])
        else {
            panic!("expected a launch");
        };
        assert_eq!(request.output, OutputMode::Silent);
        assert!(!request.rebuild_first);
    }

    #[test]
    fn rbot_z_distance_becomes_a_flag() {
        let Some(TaskInvocation::Launch { request, .. }) =
            invocation(&["charm", "rbot", "--z-distance", "1200"])
        else {
            panic!("expected a launch");
        };
        assert!(request.flags.contains(&LaunchFlag::ZDistance("1200".into())));
        assert!(CliArgs::try_parse_from(["charm", "rbot", "--z-distance", "far"]).is_err());
    }

    #[test]
    fn bad_env_assignment_is_rejected() {
        assert!(CliArgs::try_parse_from(["charm", "rbot", "--env", "nope"]).is_err());
    }

    #[test]
    fn tasks_is_not_an_invocation() {
        assert_eq!(invocation(&["charm", "tasks"]), None);
    }
}
