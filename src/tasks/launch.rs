// src/tasks/launch.rs

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::command::{CommandSpec, EnvMap, overlay};
use crate::config::{ArtifactConfig, LaunchSection};
use crate::context::ProjectContext;
use crate::errors::{CharmError, Result};
use crate::exec::{Invocation, OutputMode};

/// Environment variable pointing launched artifacts at the shader directory.
pub const SHADER_PATH_VAR: &str = "SHADER_PATH";

/// Command-line switches understood by the launched artifacts.
///
/// Flags are emitted in declaration order (the derived `Ord`), whatever order
/// the caller supplied them in:
///
/// 1. `ShmVideo` → `--video shm`
/// 2. `GenerateObjectTemplates` → `--gen-object-templates`
/// 3. `ZDistance(d)` → `--z-distance <d>`
/// 4. `Device(path)` → `--device <path>`
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LaunchFlag {
    /// Read frames from the shared-memory video source instead of the camera.
    ShmVideo,
    GenerateObjectTemplates,
    /// Initial object distance along z. Holds a number already checked by
    /// [`parse_z_distance`].
    ZDistance(String),
    /// Explicit camera device.
    Device(PathBuf),
}

impl LaunchFlag {
    pub fn tokens(&self) -> Vec<String> {
        match self {
            LaunchFlag::ShmVideo => vec!["--video".to_string(), "shm".to_string()],
            LaunchFlag::GenerateObjectTemplates => vec!["--gen-object-templates".to_string()],
            LaunchFlag::ZDistance(d) => vec!["--z-distance".to_string(), d.clone()],
            LaunchFlag::Device(path) => {
                vec!["--device".to_string(), path.display().to_string()]
            }
        }
    }
}

/// Parse a z-distance: any finite number, rendered back in canonical form.
pub fn parse_z_distance(s: &str) -> std::result::Result<String, String> {
    match s.trim().parse::<f32>() {
        Ok(d) if d.is_finite() => Ok(d.to_string()),
        _ => Err(format!("expected a finite number, got '{s}'")),
    }
}

/// Everything needed to launch one artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub artifact: String,
    /// Positional input asset; the artifact's default is used when `None`.
    pub input: Option<String>,
    pub flags: BTreeSet<LaunchFlag>,
    /// Extra variables; these win over everything else.
    pub extra_env: EnvMap,
    /// Build the artifact's target before launching.
    pub rebuild_first: bool,
    pub output: OutputMode,
}

impl LaunchRequest {
    pub fn new(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            input: None,
            flags: BTreeSet::new(),
            extra_env: EnvMap::new(),
            rebuild_first: true,
            output: OutputMode::Inherit,
        }
    }

    pub fn with_input(mut self, input: impl Into<String>) -> Self {
        self.input = Some(input.into());
        self
    }

    pub fn with_flag(mut self, flag: LaunchFlag) -> Self {
        self.flags.insert(flag);
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_env.insert(key.into(), value.into());
        self
    }

    pub fn rebuild_first(mut self, rebuild: bool) -> Self {
        self.rebuild_first = rebuild;
        self
    }

    pub fn silenced(mut self) -> Self {
        self.output = OutputMode::Silent;
        self
    }
}

/// Assembles argv and environment for produced artifacts.
#[derive(Debug)]
pub struct Launcher<'a> {
    ctx: &'a ProjectContext,
    launch: &'a LaunchSection,
    artifacts: &'a BTreeMap<String, ArtifactConfig>,
}

impl<'a> Launcher<'a> {
    pub fn new(
        ctx: &'a ProjectContext,
        launch: &'a LaunchSection,
        artifacts: &'a BTreeMap<String, ArtifactConfig>,
    ) -> Self {
        Self {
            ctx,
            launch,
            artifacts,
        }
    }

    fn artifact(&self, name: &str) -> Result<&'a ArtifactConfig> {
        self.artifacts.get(name).ok_or_else(|| {
            let known: Vec<&str> = self.artifacts.keys().map(String::as_str).collect();
            CharmError::ConfigError(format!(
                "unknown artifact '{name}' (known: {})",
                known.join(", ")
            ))
        })
    }

    /// Build-executor target that produces `artifact`.
    pub fn build_target(&self, artifact: &str) -> Result<String> {
        Ok(self.artifact(artifact)?.binary.clone())
    }

    /// Positional input: the caller's, else the artifact default under the repo.
    pub fn resolve_input(&self, request: &LaunchRequest) -> Result<Option<String>> {
        if let Some(input) = &request.input {
            return Ok(Some(input.clone()));
        }
        let artifact = self.artifact(&request.artifact)?;
        Ok(artifact
            .default_input
            .as_ref()
            .map(|p| self.ctx.repo_path(p).display().to_string()))
    }

    /// Overlay: `SHADER_PATH` ⊕ artifact env ⊕ request env (right wins).
    pub fn environment(&self, request: &LaunchRequest) -> Result<EnvMap> {
        let artifact = self.artifact(&request.artifact)?;

        let mut base = EnvMap::new();
        base.insert(
            SHADER_PATH_VAR.to_string(),
            self.ctx
                .repo_path(&self.launch.shader_dir)
                .display()
                .to_string(),
        );

        let with_artifact = overlay(&base, &artifact.env);
        Ok(overlay(&with_artifact, &request.extra_env))
    }

    /// `[binary, flag tokens.., input?]`.
    pub fn command(&self, request: &LaunchRequest) -> Result<CommandSpec> {
        let artifact = self.artifact(&request.artifact)?;
        let binary = self.ctx.build_dir().join(&artifact.binary);

        let mut spec = CommandSpec::new(binary.display().to_string());
        for flag in &request.flags {
            spec = spec.args(flag.tokens());
        }
        if let Some(input) = self.resolve_input(request)? {
            spec = spec.arg(input);
        }

        Ok(spec.envs(self.environment(request)?))
    }

    /// Launches from the repository root.
    pub fn invocation(&self, request: &LaunchRequest) -> Result<Invocation> {
        let spec = self.command(request)?;
        let scope = self.ctx.at_repo();
        Ok(match request.output {
            OutputMode::Inherit => scope.command(spec),
            OutputMode::Silent => scope.silent_command(spec),
        })
    }
}
