// src/config/validate.rs

use std::path::{Component, Path};

use crate::config::model::{ConfigFile, RawConfigFile, default_artifacts};
use crate::errors::{CharmError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::CharmError;

    fn try_from(mut raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        normalize(&mut raw);
        validate_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

/// Fill in what TOML cannot express directly.
///
/// - `cache = ""` switches the compilation cache wrapper off.
/// - Built-in artifacts stay available when the file only declares extra ones.
fn normalize(raw: &mut RawConfigFile) {
    if raw
        .configure
        .cache
        .as_deref()
        .is_some_and(|c| c.trim().is_empty())
    {
        raw.configure.cache = None;
    }

    for (name, artifact) in default_artifacts() {
        raw.artifact.entry(name).or_insert(artifact);
    }
}

/// Check the semantic invariants of a raw config.
pub fn validate_config(cfg: &RawConfigFile) -> Result<()> {
    validate_project(cfg)?;
    validate_setup(cfg)?;
    validate_clean(cfg)?;
    validate_configure(cfg)?;
    validate_build(cfg)?;
    validate_artifacts(cfg)?;
    Ok(())
}

fn validate_project(cfg: &RawConfigFile) -> Result<()> {
    ensure_repo_relative("[project].build_dir", &cfg.project.build_dir)
}

fn validate_setup(cfg: &RawConfigFile) -> Result<()> {
    if cfg.setup.installer.is_empty() || cfg.setup.installer[0].trim().is_empty() {
        return Err(CharmError::ConfigError(
            "[setup].installer must name a program".to_string(),
        ));
    }
    if cfg.setup.packages.is_empty() {
        return Err(CharmError::ConfigError(
            "[setup].packages must list at least one package".to_string(),
        ));
    }
    if let Some(blank) = cfg.setup.packages.iter().find(|p| p.trim().is_empty()) {
        return Err(CharmError::ConfigError(format!(
            "[setup].packages contains a blank entry ({blank:?})"
        )));
    }
    Ok(())
}

fn validate_clean(cfg: &RawConfigFile) -> Result<()> {
    if let Some(paths) = &cfg.clean.paths {
        for path in paths {
            ensure_repo_relative("[clean].paths", path)?;
        }
    }
    Ok(())
}

fn validate_configure(cfg: &RawConfigFile) -> Result<()> {
    if cfg.configure.cc.trim().is_empty() || cfg.configure.cxx.trim().is_empty() {
        return Err(CharmError::ConfigError(
            "[configure].cc and [configure].cxx must not be empty".to_string(),
        ));
    }
    if cfg.configure.cxx_standard.trim().is_empty() {
        return Err(CharmError::ConfigError(
            "[configure].cxx_standard must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_build(cfg: &RawConfigFile) -> Result<()> {
    if cfg.build.jobs == Some(0) {
        return Err(CharmError::ConfigError(
            "[build].jobs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_artifacts(cfg: &RawConfigFile) -> Result<()> {
    for (name, artifact) in cfg.artifact.iter() {
        if artifact.binary.trim().is_empty() {
            return Err(CharmError::ConfigError(format!(
                "artifact '{name}' has an empty `binary`"
            )));
        }
        if let Some(input) = &artifact.default_input {
            ensure_repo_relative(&format!("[artifact.{name}].default_input"), input)?;
        }
    }
    Ok(())
}

/// Paths in the config must stay inside the repository: `clean` deletes them.
fn ensure_repo_relative(field: &str, value: &str) -> Result<()> {
    let path = Path::new(value);

    if value.trim().is_empty() {
        return Err(CharmError::ConfigError(format!("{field} must not be empty")));
    }

    let escapes = path.components().any(|c| {
        matches!(
            c,
            Component::RootDir | Component::Prefix(_) | Component::ParentDir
        )
    });
    if escapes {
        return Err(CharmError::ConfigError(format!(
            "{field} must be a path inside the repository (got '{value}')"
        )));
    }

    let only_cur_dir = path.components().all(|c| matches!(c, Component::CurDir));
    if only_cur_dir {
        return Err(CharmError::ConfigError(format!(
            "{field} must not point at the repository root itself"
        )));
    }

    Ok(())
}
