use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use charm::errors::{CharmError, Result};
use charm::exec::{CommandRunner, Invocation};
use charm::fs::FileSystem;
use charm::fs::mock::MockFileSystem;

/// One observable side effect, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Run(Invocation),
    CreateDir(PathBuf),
    Remove(PathBuf),
}

/// Shared, ordered record of everything the engine did.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Run(inv) => Some(inv),
                _ => None,
            })
            .collect()
    }

    /// Program names of every executed command.
    pub fn programs(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(|inv| inv.spec.program().to_string())
            .collect()
    }

    /// Compact labels: `run:<program>`, `mkdir:<path>`, `rm:<path>`.
    pub fn labels(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| match c {
                Call::Run(inv) => format!("run:{}", inv.spec.program()),
                Call::CreateDir(p) => format!("mkdir:{}", p.display()),
                Call::Remove(p) => format!("rm:{}", p.display()),
            })
            .collect()
    }
}

/// A fake runner that:
/// - records each invocation in the journal
/// - fails with a configured exit code for selected programs
/// - succeeds otherwise, without spawning anything.
#[derive(Debug)]
pub struct RecordingRunner {
    journal: Journal,
    failures: HashMap<String, i32>,
}

impl RecordingRunner {
    pub fn new(journal: Journal) -> Self {
        Self {
            journal,
            failures: HashMap::new(),
        }
    }

    /// Make every command whose program is `program` exit with `code`.
    pub fn fail_program(mut self, program: &str, code: i32) -> Self {
        self.failures.insert(program.to_string(), code);
        self
    }
}

impl CommandRunner for RecordingRunner {
    fn run(
        &mut self,
        invocation: Invocation,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        let journal = self.journal.clone();
        let failure = self.failures.get(invocation.spec.program()).copied();

        Box::pin(async move {
            let line = invocation.spec.to_shell_line();
            journal.push(Call::Run(invocation));
            match failure {
                Some(code) => Err(CharmError::ExternalTool {
                    command: line,
                    code,
                }),
                None => Ok(()),
            }
        })
    }
}

/// [`MockFileSystem`] that also writes mutations into a [`Journal`].
#[derive(Debug, Clone)]
pub struct JournalFs {
    pub inner: MockFileSystem,
    journal: Journal,
}

impl JournalFs {
    pub fn new(inner: MockFileSystem, journal: Journal) -> Self {
        Self { inner, journal }
    }
}

impl FileSystem for JournalFs {
    fn exists(&self, path: &Path) -> bool {
        self.inner.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.is_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        self.inner.canonicalize(path)
    }

    fn create_dir_all(&self, path: &Path) -> anyhow::Result<()> {
        self.journal.push(Call::CreateDir(path.to_path_buf()));
        self.inner.create_dir_all(path)
    }

    fn remove_all(&self, path: &Path) -> anyhow::Result<()> {
        self.journal.push(Call::Remove(path.to_path_buf()));
        self.inner.remove_all(path)
    }
}
