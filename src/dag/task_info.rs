// src/dag/task_info.rs

//! Static task metadata and per-invocation state.

use std::fmt;

use crate::engine::TaskName;

/// State of one task invocation.
///
/// `Pending → Running → {Succeeded, Failed}`. A task whose prerequisite
/// failed goes straight from `Pending` to `Failed`. Nothing is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRunState {
    Pending,
    Running,
    Succeeded,
    Failed,
}

impl TaskRunState {
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskRunState::Succeeded | TaskRunState::Failed)
    }
}

/// Type and default of a task parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Flag { default: bool },
    Text { default: Option<&'static str> },
    /// Repeatable `KEY=VALUE` pairs.
    Assignments,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamDef {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl ParamDef {
    pub fn flag(name: &'static str, default: bool) -> Self {
        Self {
            name,
            kind: ParamKind::Flag { default },
        }
    }

    pub fn text(name: &'static str, default: Option<&'static str>) -> Self {
        Self {
            name,
            kind: ParamKind::Text { default },
        }
    }

    pub fn assignments(name: &'static str) -> Self {
        Self {
            name,
            kind: ParamKind::Assignments,
        }
    }
}

impl fmt::Display for ParamDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ParamKind::Flag { default } => write!(f, "{}={}", self.name, default),
            ParamKind::Text { default: Some(d) } => write!(f, "{}={}", self.name, d),
            ParamKind::Text { default: None } => write!(f, "{}?", self.name),
            ParamKind::Assignments => write!(f, "{}=[K=V..]", self.name),
        }
    }
}

/// A named, invokable task.
#[derive(Debug, Clone)]
pub struct TaskDef {
    pub name: TaskName,
    pub about: &'static str,
    pub is_default: bool,
    pub params: Vec<ParamDef>,
    /// Task that runs first, when enabled.
    pub depends_on: Option<TaskName>,
    /// Boolean parameter that switches the prerequisite on or off.
    /// `None` means the prerequisite always runs.
    pub gate: Option<&'static str>,
}

impl TaskDef {
    pub fn new(name: &str, about: &'static str) -> Self {
        Self {
            name: name.to_string(),
            about,
            is_default: false,
            params: Vec::new(),
            depends_on: None,
            gate: None,
        }
    }

    pub fn default_task(mut self) -> Self {
        self.is_default = true;
        self
    }

    pub fn param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }

    pub fn depends_on(mut self, task: &str, gate: Option<&'static str>) -> Self {
        self.depends_on = Some(task.to_string());
        self.gate = gate;
        self
    }

    pub fn param_named(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }
}
