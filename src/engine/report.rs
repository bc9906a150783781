// src/engine/report.rs

use crate::dag::TaskRunState;
use crate::engine::TaskName;

/// One state change of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTransition {
    pub task: TaskName,
    pub state: TaskRunState,
}

/// Ordered log of task state transitions for one orchestrator run.
#[derive(Debug, Clone, Default)]
pub struct TaskReport {
    transitions: Vec<TaskTransition>,
}

impl TaskReport {
    pub fn record(&mut self, task: &str, state: TaskRunState) {
        self.transitions.push(TaskTransition {
            task: task.to_string(),
            state,
        });
    }

    pub fn transitions(&self) -> &[TaskTransition] {
        &self.transitions
    }

    /// Latest state of `task`, if it took part.
    pub fn state_of(&self, task: &str) -> Option<TaskRunState> {
        self.transitions
            .iter()
            .rev()
            .find(|t| t.task == task)
            .map(|t| t.state)
    }

    /// Tasks that reached `state`, in the order they reached it.
    pub fn tasks_in_state(&self, state: TaskRunState) -> Vec<&str> {
        self.transitions
            .iter()
            .filter(|t| t.state == state)
            .map(|t| t.task.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_state_wins() {
        let mut report = TaskReport::default();
        report.record("clean", TaskRunState::Pending);
        report.record("clean", TaskRunState::Running);
        report.record("clean", TaskRunState::Succeeded);

        assert_eq!(report.state_of("clean"), Some(TaskRunState::Succeeded));
        assert_eq!(report.state_of("build"), None);
        assert_eq!(report.tasks_in_state(TaskRunState::Running), vec!["clean"]);
    }
}
