#![allow(dead_code)]

use std::path::Path;

use charm::config::{ArtifactConfig, ConfigFile, RawConfigFile};
use charm::context::ProjectContext;
use charm::fs::mock::MockFileSystem;
use charm::types::{Executor, Generator};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_packages(mut self, packages: &[&str]) -> Self {
        self.config.setup.packages = packages.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_installer(mut self, argv: &[&str]) -> Self {
        self.config.setup.installer = argv.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn with_generator(mut self, generator: Generator) -> Self {
        self.config.configure.generator = generator;
        self
    }

    pub fn with_executor(mut self, executor: Executor) -> Self {
        self.config.build.executor = executor;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.config.build.jobs = Some(jobs);
        self
    }

    pub fn with_clean_paths(mut self, paths: &[&str]) -> Self {
        self.config.clean.paths = Some(paths.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn with_artifact(mut self, name: &str, artifact: ArtifactConfig) -> Self {
        self.config.artifact.insert(name.to_string(), artifact);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A mock checkout at `/repo` with sources but no build directory.
pub fn fresh_checkout() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("/repo/meson.build");
    fs.add_file("/repo/CMakeLists.txt");
    fs.add_file("/repo/src/rbot.cpp");
    fs.add_file("/repo/objects/box.obj");
    fs
}

/// Context for `/repo` with the config's build dir.
pub fn context(fs: &MockFileSystem, cfg: &ConfigFile) -> ProjectContext {
    ProjectContext::resolve(fs, Path::new("/repo"), &cfg.project.build_dir)
        .expect("mock repo root exists")
}
