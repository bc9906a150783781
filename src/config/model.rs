// src/config/model.rs

use std::collections::{BTreeMap, BTreeSet};

use serde::Deserialize;

use crate::types::{Executor, Generator};

/// Input asset handed to `rbot` when the caller does not name one.
///
/// Resolved relative to the repository root.
pub const DEFAULT_RBOT_OBJECT: &str = "objects/box.obj";

/// Top-level configuration as read from `Charm.toml`.
///
/// Every section is optional; a repository without a `Charm.toml` gets the
/// defaults below:
///
/// ```toml
/// [project]
/// build_dir = "build"
///
/// [setup]
/// installer = ["sudo", "pacman", "-S", "--needed", "--noconfirm"]
/// packages = [
///     "assimp", "boost", "ccache", "clang", "cmake", "cxxopts", "meson", "ninja",
///     "opencv", "qt5-base",
/// ]
///
/// [configure]
/// generator = "meson"
/// cache = "ccache"
///
/// [build]
/// executor = "ninja"
///
/// [artifact.rbot]
/// binary = "rbot"
/// default_input = "objects/box.obj"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub setup: SetupSection,

    #[serde(default)]
    pub clean: CleanSection,

    #[serde(default)]
    pub configure: ConfigureSection,

    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub launch: LaunchSection,

    /// Launchable artifacts keyed by name (`[artifact.<name>]`).
    #[serde(default = "default_artifacts")]
    pub artifact: BTreeMap<String, ArtifactConfig>,
}

impl Default for RawConfigFile {
    fn default() -> Self {
        Self {
            project: ProjectSection::default(),
            setup: SetupSection::default(),
            clean: CleanSection::default(),
            configure: ConfigureSection::default(),
            build: BuildSection::default(),
            launch: LaunchSection::default(),
            artifact: default_artifacts(),
        }
    }
}

/// Validated configuration.
///
/// Only obtainable through `TryFrom<RawConfigFile>` (see `validate.rs`), so
/// holders can rely on a non-empty package list, a non-empty installer argv,
/// and repo-relative clean paths.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub setup: SetupSection,
    pub clean: CleanSection,
    pub configure: ConfigureSection,
    pub build: BuildSection,
    pub launch: LaunchSection,
    pub artifact: BTreeMap<String, ArtifactConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            project: raw.project,
            setup: raw.setup,
            clean: raw.clean,
            configure: raw.configure,
            build: raw.build,
            launch: raw.launch,
            artifact: raw.artifact,
        }
    }

    /// Look up a launchable artifact by name.
    pub fn artifact(&self, name: &str) -> Option<&ArtifactConfig> {
        self.artifact.get(name)
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSection {
    /// Build output directory, relative to the repository root.
    #[serde(default = "default_build_dir")]
    pub build_dir: String,
}

fn default_build_dir() -> String {
    "build".to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
        }
    }
}

/// `[setup]` section: system packages and the installer that fetches them.
#[derive(Debug, Clone, Deserialize)]
pub struct SetupSection {
    /// Installer argv prefix; the package names are appended in one batch.
    #[serde(default = "default_installer")]
    pub installer: Vec<String>,

    /// Package names. Duplicates collapse.
    #[serde(default = "default_packages")]
    pub packages: BTreeSet<String>,
}

fn default_installer() -> Vec<String> {
    ["sudo", "pacman", "-S", "--needed", "--noconfirm"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_packages() -> BTreeSet<String> {
    [
        "assimp", "boost", "ccache", "clang", "cmake", "cxxopts", "meson", "ninja", "opencv",
        "qt5-base",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for SetupSection {
    fn default() -> Self {
        Self {
            installer: default_installer(),
            packages: default_packages(),
        }
    }
}

/// `[clean]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CleanSection {
    /// Repo-relative paths removed by `clean`. Defaults to the build dir.
    #[serde(default)]
    pub paths: Option<Vec<String>>,
}

/// `[configure]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigureSection {
    #[serde(default)]
    pub generator: Generator,

    /// C compiler front end.
    #[serde(default = "default_cc")]
    pub cc: String,

    /// C++ compiler front end.
    #[serde(default = "default_cxx")]
    pub cxx: String,

    /// Optional compilation cache wrapper placed in front of both compilers.
    /// An empty string disables it.
    #[serde(default = "default_cache")]
    pub cache: Option<String>,

    /// Optimization / link-time-optimization flags exported as
    /// `CFLAGS`, `CCFLAGS` and `CXXFLAGS`.
    #[serde(default = "default_flags")]
    pub flags: Vec<String>,

    /// C++ language standard (`20` → `c++20`, never `gnu++20`).
    #[serde(default = "default_cxx_standard")]
    pub cxx_standard: String,
}

fn default_cc() -> String {
    "clang".to_string()
}

fn default_cxx() -> String {
    "clang++".to_string()
}

fn default_cache() -> Option<String> {
    Some("ccache".to_string())
}

fn default_flags() -> Vec<String> {
    vec!["-O3".to_string(), "-flto".to_string()]
}

fn default_cxx_standard() -> String {
    "20".to_string()
}

impl Default for ConfigureSection {
    fn default() -> Self {
        Self {
            generator: Generator::default(),
            cc: default_cc(),
            cxx: default_cxx(),
            cache: default_cache(),
            flags: default_flags(),
            cxx_standard: default_cxx_standard(),
        }
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BuildSection {
    #[serde(default)]
    pub executor: Executor,

    /// Fixed job count. If `None`, the number of available processing units
    /// is used.
    #[serde(default)]
    pub jobs: Option<usize>,
}

/// `[launch]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct LaunchSection {
    /// Shader search directory (repo-relative), exported as `SHADER_PATH`.
    #[serde(default = "default_shader_dir")]
    pub shader_dir: String,
}

fn default_shader_dir() -> String {
    "shaders".to_string()
}

impl Default for LaunchSection {
    fn default() -> Self {
        Self {
            shader_dir: default_shader_dir(),
        }
    }
}

/// `[artifact.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactConfig {
    /// Binary path relative to the build directory.
    pub binary: String,

    /// Repo-relative input asset used when no positional argument is given.
    #[serde(default)]
    pub default_input: Option<String>,

    /// Environment applied to every launch of this artifact.
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

impl ArtifactConfig {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            default_input: None,
            env: BTreeMap::new(),
        }
    }
}

pub(crate) fn default_artifacts() -> BTreeMap<String, ArtifactConfig> {
    let mut rbot = ArtifactConfig::new("rbot");
    rbot.default_input = Some(DEFAULT_RBOT_OBJECT.to_string());

    let mut artifacts = BTreeMap::new();
    artifacts.insert("rbot".to_string(), rbot);
    artifacts.insert("shmvideo".to_string(), ArtifactConfig::new("shmvideo"));
    artifacts
}
