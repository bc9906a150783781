// src/config/mod.rs

//! Project configuration for charm.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load `Charm.toml` from disk, falling back to defaults (`loader.rs`).
//! - Validate paths, package lists and tool settings (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_or_default};
pub use model::{
    ArtifactConfig, BuildSection, CleanSection, ConfigFile, ConfigureSection, LaunchSection,
    ProjectSection, RawConfigFile, SetupSection, DEFAULT_RBOT_OBJECT,
};
pub use validate::validate_config;
