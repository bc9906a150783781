// src/tasks/install.rs

use crate::command::CommandSpec;
use crate::config::SetupSection;
use crate::context::ProjectContext;
use crate::errors::{CharmError, Result};
use crate::exec::Invocation;

/// Installs the declared system packages with a single installer call.
///
/// All packages go into one command so the package manager can resolve and
/// download them together.
#[derive(Debug)]
pub struct DependencyInstaller<'a> {
    ctx: &'a ProjectContext,
    setup: &'a SetupSection,
}

impl<'a> DependencyInstaller<'a> {
    pub fn new(ctx: &'a ProjectContext, setup: &'a SetupSection) -> Self {
        Self { ctx, setup }
    }

    /// Installer argv followed by every package, sorted and de-duplicated.
    pub fn command(&self) -> Result<CommandSpec> {
        let (program, prefix) = self.setup.installer.split_first().ok_or_else(|| {
            CharmError::ConfigError("[setup].installer must name a program".to_string())
        })?;

        Ok(CommandSpec::new(program.as_str())
            .args(prefix.iter().cloned())
            .args(self.setup.packages.iter().cloned()))
    }

    pub fn invocation(&self) -> Result<Invocation> {
        Ok(self.ctx.at_repo().command(self.command()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::Path;

    #[test]
    fn batches_all_packages_after_installer_prefix() {
        let fs = MockFileSystem::new();
        fs.add_dir("/repo");
        let ctx = ProjectContext::resolve(&fs, Path::new("/repo"), "build").unwrap();
        let setup = SetupSection {
            installer: vec!["yay".into(), "-S".into(), "--needed".into()],
            packages: ["opencv", "cmake", "assimp", "cmake"]
                .into_iter()
                .map(String::from)
                .collect(),
        };

        let inv = DependencyInstaller::new(&ctx, &setup).invocation().unwrap();

        assert_eq!(
            inv.spec.argv(),
            &["yay", "-S", "--needed", "assimp", "cmake", "opencv"]
        );
        assert_eq!(inv.cwd, Path::new("/repo"));
        assert!(inv.spec.env_overlay().is_empty());
    }

    #[test]
    fn empty_installer_is_an_error() {
        let fs = MockFileSystem::new();
        fs.add_dir("/repo");
        let ctx = ProjectContext::resolve(&fs, Path::new("/repo"), "build").unwrap();
        let setup = SetupSection {
            installer: Vec::new(),
            packages: ["cmake".to_string()].into_iter().collect(),
        };

        let err = DependencyInstaller::new(&ctx, &setup).command().unwrap_err();
        assert!(matches!(err, CharmError::ConfigError(msg) if msg.contains("installer")));
    }
}
