// src/tasks/mod.rs

//! Task components.
//!
//! Each component turns project configuration into [`crate::exec::Invocation`]s
//! (or, for [`clean`], filesystem operations). None of them run anything on
//! their own: the [`crate::engine::Orchestrator`] sequences and dispatches.
//!
//! - [`clean`]: removes build artifacts.
//! - [`install`]: `DependencyInstaller`, one batched package-manager call.
//! - [`configure`]: `BuildConfigurator`, cmake or meson.
//! - [`build`]: `BuildExecutor`, make or ninja with a job count.
//! - [`launch`]: `Launcher`, argv/env for produced artifacts.

pub mod build;
pub mod clean;
pub mod configure;
pub mod install;
pub mod launch;

pub use build::{BuildExecutor, available_jobs};
pub use clean::{CleanSummary, Cleaner};
pub use configure::BuildConfigurator;
pub use install::DependencyInstaller;
pub use launch::{LaunchFlag, LaunchRequest, Launcher, SHADER_PATH_VAR, parse_z_distance};
