// src/tasks/clean.rs

use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::CleanSection;
use crate::context::ProjectContext;
use crate::errors::Result;
use crate::fs::FileSystem;

/// Removes build artifacts.
///
/// Idempotent: paths that are already gone are skipped, so a second run
/// against a clean tree succeeds and changes nothing.
#[derive(Debug, Clone)]
pub struct Cleaner {
    targets: Vec<PathBuf>,
}

/// What a clean pass removed (or, in dry-run mode, would remove).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanSummary {
    pub removed: Vec<PathBuf>,
    pub dry_run: bool,
}

impl Cleaner {
    pub fn new(ctx: &ProjectContext, section: &CleanSection) -> Self {
        let targets = match &section.paths {
            Some(paths) => paths.iter().map(|p| ctx.repo_path(p)).collect(),
            None => vec![ctx.build_dir().to_path_buf()],
        };
        Self { targets }
    }

    pub fn clean(&self, fs: &dyn FileSystem, dry_run: bool) -> Result<CleanSummary> {
        let mut removed = Vec::new();

        for target in &self.targets {
            if !fs.exists(target) {
                debug!(path = %target.display(), "already clean");
                continue;
            }

            if dry_run {
                info!(path = %target.display(), "would remove");
                println!("would remove {}", target.display());
            } else {
                info!(path = %target.display(), "removing");
                fs.remove_all(target)?;
            }
            removed.push(target.clone());
        }

        Ok(CleanSummary { removed, dry_run })
    }
}
