// src/context.rs

//! Repository and build-directory paths, plus scoped working directories.

use std::path::{Path, PathBuf};

use crate::command::CommandSpec;
use crate::errors::{CharmError, Result};
use crate::exec::{Invocation, OutputMode};
use crate::fs::FileSystem;

/// Immutable paths shared by every task.
///
/// Built once in [`crate::run`] and handed to components by reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectContext {
    repo_root: PathBuf,
    build_dir: PathBuf,
}

impl ProjectContext {
    /// Resolve `repo_root` to an absolute path and derive the build dir.
    ///
    /// A missing repository root is a configuration error: there is nothing
    /// to build.
    pub fn resolve(fs: &dyn FileSystem, repo_root: &Path, build_dir: &str) -> Result<Self> {
        if !fs.is_dir(repo_root) {
            return Err(CharmError::RepoRootMissing(repo_root.to_path_buf()));
        }
        let repo_root = fs
            .canonicalize(repo_root)
            .map_err(|_| CharmError::RepoRootMissing(repo_root.to_path_buf()))?;
        let build_dir = repo_root.join(build_dir);
        Ok(Self {
            repo_root,
            build_dir,
        })
    }

    pub fn repo_root(&self) -> &Path {
        &self.repo_root
    }

    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Resolve a repo-relative path. Absolute inputs are returned unchanged.
    pub fn repo_path(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.repo_root.join(relative)
    }

    /// Scope rooted at the repository.
    pub fn at_repo(&self) -> WorkingDir {
        WorkingDir {
            dir: self.repo_root.clone(),
        }
    }

    /// Scope rooted at the build directory.
    pub fn at_build_dir(&self) -> WorkingDir {
        WorkingDir {
            dir: self.build_dir.clone(),
        }
    }

    /// Create the build directory (and parents) if it is absent.
    pub fn ensure_build_dir(&self, fs: &dyn FileSystem) -> Result<()> {
        fs.create_dir_all(&self.build_dir)?;
        Ok(())
    }

    /// Source directory argument for a generator running inside the build dir.
    ///
    /// `..` when the build dir is a direct child of the repo, otherwise the
    /// absolute repository path.
    pub fn source_dir_from_build_dir(&self) -> String {
        if self.build_dir.parent() == Some(self.repo_root.as_path()) {
            "..".to_string()
        } else {
            self.repo_root.display().to_string()
        }
    }
}

/// Working-directory scope for commands.
///
/// Every [`Invocation`] built through a scope carries the scope's directory
/// and the child process is started there. The orchestrator's own working
/// directory never changes, so there is nothing to restore on any exit path.
#[derive(Debug, Clone)]
pub struct WorkingDir {
    dir: PathBuf,
}

impl WorkingDir {
    /// Invocation with pass-through terminal output.
    pub fn command(&self, spec: CommandSpec) -> Invocation {
        Invocation::new(spec, self.dir.clone(), OutputMode::Inherit)
    }

    /// Invocation whose output is discarded.
    pub fn silent_command(&self, spec: CommandSpec) -> Invocation {
        Invocation::new(spec, self.dir.clone(), OutputMode::Silent)
    }
}
