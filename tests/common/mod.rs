#![allow(dead_code)]

pub use charm_test_utils::builders::{ConfigFileBuilder, context, fresh_checkout};
pub use charm_test_utils::init_tracing;
pub use charm_test_utils::recording::{Call, Journal, JournalFs, RecordingRunner};

use charm::config::ConfigFile;
use charm::context::ProjectContext;
use charm::dag::TaskRegistry;
use charm::engine::Orchestrator;

/// Everything an orchestrator borrows, owned in one place.
pub struct Fixture {
    pub cfg: ConfigFile,
    pub ctx: ProjectContext,
    pub registry: TaskRegistry,
    pub fs: JournalFs,
    pub journal: Journal,
}

impl Fixture {
    /// `/repo` checkout without a build directory.
    pub fn fresh(cfg: ConfigFile) -> Self {
        init_tracing();
        let mock = fresh_checkout();
        let ctx = context(&mock, &cfg);
        let journal = Journal::new();
        Self {
            cfg,
            ctx,
            registry: TaskRegistry::builtin().expect("builtin registry is valid"),
            fs: JournalFs::new(mock, journal.clone()),
            journal,
        }
    }

    /// Orchestrator with a recording runner and a fixed `-j4`.
    pub fn orchestrator(&self) -> Orchestrator<'_, RecordingRunner> {
        self.orchestrator_with(RecordingRunner::new(self.journal.clone()))
    }

    pub fn orchestrator_with(&self, runner: RecordingRunner) -> Orchestrator<'_, RecordingRunner> {
        Orchestrator::new(&self.ctx, &self.cfg, &self.registry, &self.fs, runner)
            .with_jobs(Some(4))
    }
}
