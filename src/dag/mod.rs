// src/dag/mod.rs

//! Task declarations and their dependency graph.
//!
//! - [`task_info`] holds the static description of a task (`TaskDef`) and
//!   the per-invocation state machine (`TaskRunState`).
//! - [`graph`] holds the validated `TaskRegistry`.

pub mod graph;
pub mod task_info;

pub use graph::TaskRegistry;
pub use task_info::{ParamDef, ParamKind, TaskDef, TaskRunState};
