// src/fs/mod.rs

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::command::quote;

pub mod mock;

/// Filesystem operations the task engine needs.
///
/// Clean and the build-dir invariant go through this trait so tests can run
/// them against [`mock::MockFileSystem`].
pub trait FileSystem: Send + Sync + Debug {
    fn exists(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf>;

    /// Create `path` and any missing parents. Existing directories are fine.
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Remove a file or a whole directory tree.
    fn remove_all(&self, path: &Path) -> Result<()>;
}

/// Implementation that uses `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn exists(&self, path: &Path) -> bool {
        // `symlink_metadata` so dangling links (e.g. compile_commands.json) count.
        path.symlink_metadata().is_ok()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).with_context(|| format!("canonicalizing {:?}", path))
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).with_context(|| format!("creating dir {:?}", path))
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        let meta = path
            .symlink_metadata()
            .with_context(|| format!("inspecting {:?}", path))?;
        if meta.is_dir() {
            fs::remove_dir_all(path).with_context(|| format!("removing dir {:?}", path))
        } else {
            fs::remove_file(path).with_context(|| format!("removing file {:?}", path))
        }
    }
}

/// Reads from the real filesystem, logs mutations instead of applying them.
///
/// Used with `--dry-run-commands` so a dry run leaves the tree untouched.
#[derive(Debug, Clone, Default)]
pub struct DryRunFileSystem;

impl FileSystem for DryRunFileSystem {
    fn exists(&self, path: &Path) -> bool {
        RealFileSystem.exists(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        RealFileSystem.is_dir(path)
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        RealFileSystem.canonicalize(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "dry run: mkdir -p");
        println!("mkdir -p {}", quote(&path.display().to_string()));
        Ok(())
    }

    fn remove_all(&self, path: &Path) -> Result<()> {
        info!(path = %path.display(), "dry run: rm -rf");
        println!("rm -rf {}", quote(&path.display().to_string()));
        Ok(())
    }
}
