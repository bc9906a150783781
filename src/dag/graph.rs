// src/dag/graph.rs

use std::collections::BTreeMap;

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use crate::dag::task_info::{ParamDef, ParamKind, TaskDef};
use crate::errors::{CharmError, Result};

/// Validated set of tasks keyed by name.
///
/// Guarantees: unique names, at most one default task, every `depends_on`
/// names a known task, every gate names a boolean parameter, no cycles.
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, TaskDef>,
}

impl TaskRegistry {
    /// Build and validate a registry.
    pub fn new(defs: Vec<TaskDef>) -> Result<Self> {
        let mut tasks = BTreeMap::new();
        for def in defs {
            if tasks.contains_key(&def.name) {
                return Err(CharmError::ConfigError(format!(
                    "task '{}' is declared twice",
                    def.name
                )));
            }
            tasks.insert(def.name.clone(), def);
        }

        let registry = Self { tasks };
        registry.validate()?;
        Ok(registry)
    }

    /// The tasks this binary ships with.
    pub fn builtin() -> Result<Self> {
        Self::new(builtin_tasks())
    }

    pub fn get(&self, name: &str) -> Result<&TaskDef> {
        self.tasks
            .get(name)
            .ok_or_else(|| CharmError::TaskNotFound(name.to_string()))
    }

    pub fn tasks(&self) -> impl Iterator<Item = &TaskDef> {
        self.tasks.values()
    }

    pub fn default_task(&self) -> Option<&TaskDef> {
        self.tasks.values().find(|t| t.is_default)
    }

    /// Transitive prerequisites of `name`, in the order they would run.
    ///
    /// Ignores gates; this is the full chain.
    pub fn prerequisites(&self, name: &str) -> Result<Vec<&TaskDef>> {
        let mut chain = Vec::new();
        let mut current = self.get(name)?;
        while let Some(dep) = &current.depends_on {
            current = self.get(dep)?;
            chain.push(current);
        }
        chain.reverse();
        Ok(chain)
    }

    fn validate(&self) -> Result<()> {
        self.validate_single_default()?;
        self.validate_dependencies()?;
        self.validate_acyclic()?;
        Ok(())
    }

    fn validate_single_default(&self) -> Result<()> {
        let defaults: Vec<&str> = self
            .tasks
            .values()
            .filter(|t| t.is_default)
            .map(|t| t.name.as_str())
            .collect();
        if defaults.len() > 1 {
            return Err(CharmError::ConfigError(format!(
                "at most one default task is allowed (found {})",
                defaults.join(", ")
            )));
        }
        Ok(())
    }

    fn validate_dependencies(&self) -> Result<()> {
        for (name, task) in self.tasks.iter() {
            if let Some(dep) = &task.depends_on {
                if !self.tasks.contains_key(dep) {
                    return Err(CharmError::ConfigError(format!(
                        "task '{name}' depends on unknown task '{dep}'"
                    )));
                }
                if dep == name {
                    return Err(CharmError::ConfigError(format!(
                        "task '{name}' cannot depend on itself"
                    )));
                }
            }
            if let Some(gate) = task.gate {
                let is_flag = matches!(
                    task.param_named(gate),
                    Some(ParamDef {
                        kind: ParamKind::Flag { .. },
                        ..
                    })
                );
                if !is_flag {
                    return Err(CharmError::ConfigError(format!(
                        "task '{name}' is gated on '{gate}', which is not a flag parameter"
                    )));
                }
            }
        }
        Ok(())
    }

    fn validate_acyclic(&self) -> Result<()> {
        // Edge direction: dependency -> dependent.
        let mut graph: DiGraphMap<&str, ()> = DiGraphMap::new();

        for name in self.tasks.keys() {
            graph.add_node(name.as_str());
        }
        for (name, task) in self.tasks.iter() {
            if let Some(dep) = &task.depends_on {
                graph.add_edge(dep.as_str(), name.as_str(), ());
            }
        }

        match toposort(&graph, None) {
            Ok(_order) => Ok(()),
            Err(cycle) => Err(CharmError::DagCycle(format!(
                "cycle detected in task graph involving task '{}'",
                cycle.node_id()
            ))),
        }
    }
}

fn builtin_tasks() -> Vec<TaskDef> {
    let launch_params = |t: TaskDef| {
        t.param(ParamDef::flag("ninja", true))
            .param(ParamDef::text("device", None))
            .param(ParamDef::assignments("env"))
    };

    vec![
        TaskDef::new("clean", "Remove build artifacts").param(ParamDef::flag("dry_run", false)),
        TaskDef::new("setup", "Install packages, then configure")
            .param(ParamDef::flag("clean", true))
            .depends_on("clean", Some("clean")),
        TaskDef::new("configure", "Run the configured generator"),
        TaskDef::new("cmake", "Configure with cmake"),
        TaskDef::new("meson", "Configure with meson"),
        TaskDef::new("build", "Run the configured build executor")
            .default_task()
            .param(ParamDef::text("target", None)),
        TaskDef::new("make", "Build with make").param(ParamDef::text("target", None)),
        TaskDef::new("ninja", "Build with ninja").param(ParamDef::text("target", None)),
        launch_params(
            TaskDef::new("rbot", "Build and launch rbot")
                .param(ParamDef::text("object", None))
                .param(ParamDef::flag("shm", false))
                .param(ParamDef::flag("gen_object_templates", false))
                .param(ParamDef::text("z_distance", None)),
        )
        .depends_on("build", Some("ninja")),
        launch_params(TaskDef::new("shmvideo", "Build and launch shmvideo"))
            .depends_on("build", Some("ninja")),
        TaskDef::new("run", "Build and launch any artifact")
            .param(ParamDef::text("artifact", None))
            .param(ParamDef::text("input", None))
            .param(ParamDef::flag("build", true))
            .param(ParamDef::assignments("env"))
            .depends_on("build", Some("build")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_is_valid() {
        let registry = TaskRegistry::builtin().unwrap();
        assert_eq!(registry.default_task().map(|t| t.name.as_str()), Some("build"));
        assert_eq!(
            registry.get("setup").unwrap().depends_on.as_deref(),
            Some("clean")
        );
        assert_eq!(
            registry.get("rbot").unwrap().depends_on.as_deref(),
            Some("build")
        );
    }

    #[test]
    fn prerequisites_follow_the_chain() {
        let registry = TaskRegistry::new(vec![
            TaskDef::new("a", ""),
            TaskDef::new("b", "").depends_on("a", None),
            TaskDef::new("c", "").depends_on("b", None),
        ])
        .unwrap();

        let chain: Vec<&str> = registry
            .prerequisites("c")
            .unwrap()
            .iter()
            .map(|t| t.name.as_str())
            .collect();
        assert_eq!(chain, vec!["a", "b"]);
    }

    #[test]
    fn rejects_two_defaults() {
        let err = TaskRegistry::new(vec![
            TaskDef::new("a", "").default_task(),
            TaskDef::new("b", "").default_task(),
        ])
        .unwrap_err();
        assert!(matches!(err, CharmError::ConfigError(msg) if msg.contains("default")));
    }

    #[test]
    fn rejects_duplicate_names() {
        let err =
            TaskRegistry::new(vec![TaskDef::new("a", ""), TaskDef::new("a", "")]).unwrap_err();
        assert!(matches!(err, CharmError::ConfigError(msg) if msg.contains("twice")));
    }

    #[test]
    fn rejects_unknown_dependency() {
        let err = TaskRegistry::new(vec![TaskDef::new("a", "").depends_on("ghost", None)])
            .unwrap_err();
        assert!(matches!(err, CharmError::ConfigError(msg) if msg.contains("ghost")));
    }

    #[test]
    fn rejects_gate_that_is_not_a_flag() {
        let err = TaskRegistry::new(vec![
            TaskDef::new("a", ""),
            TaskDef::new("b", "")
                .param(ParamDef::text("when", None))
                .depends_on("a", Some("when")),
        ])
        .unwrap_err();
        assert!(matches!(err, CharmError::ConfigError(msg) if msg.contains("when")));
    }

    #[test]
    fn rejects_cycles() {
        let err = TaskRegistry::new(vec![
            TaskDef::new("a", "").depends_on("b", None),
            TaskDef::new("b", "").depends_on("a", None),
        ])
        .unwrap_err();
        assert!(matches!(err, CharmError::DagCycle(msg) if msg.contains("cycle detected")));
    }

    #[test]
    fn unknown_task_lookup() {
        let registry = TaskRegistry::builtin().unwrap();
        assert!(matches!(
            registry.get("deploy"),
            Err(CharmError::TaskNotFound(n)) if n == "deploy"
        ));
    }
}
