// tests/config_errors.rs

use std::io::Write;
use tempfile::NamedTempFile;

use charm::config::{load_and_validate, load_or_default};
use charm::errors::CharmError;
use charm::types::{Executor, Generator};

#[test]
fn test_full_config_is_loaded() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[project]
build_dir = "out"

[setup]
installer = ["pacman", "-S"]
packages = ["opencv", "cmake"]

[configure]
generator = "cmake"
cache = ""
cxx_standard = "17"

[build]
executor = "make"
jobs = 2

[artifact.viewer]
binary = "tools/viewer"
env = {{ VIEWER_MODE = "batch" }}
"#
    )
    .unwrap();

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.project.build_dir, "out");
    assert_eq!(cfg.setup.installer, vec!["pacman", "-S"]);
    assert_eq!(cfg.configure.generator, Generator::Cmake);
    assert!(cfg.configure.cache.is_none());
    assert_eq!(cfg.configure.cxx_standard, "17");
    assert_eq!(cfg.build.executor, Executor::Make);
    assert_eq!(cfg.build.jobs, Some(2));
    assert_eq!(cfg.artifact("viewer").unwrap().env["VIEWER_MODE"], "batch");
    assert!(cfg.artifact("rbot").is_some());
}

#[test]
fn test_escaping_clean_path_returns_config_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[clean]
paths = ["build", "../sibling"]
"#
    )
    .unwrap();

    match load_and_validate(file.path()) {
        Err(CharmError::ConfigError(msg)) => {
            assert!(msg.contains("[clean].paths"));
            assert!(msg.contains("../sibling"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_malformed_toml_returns_toml_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[build\nexecutor = ninja").unwrap();

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, CharmError::TomlError(_)));
    assert_eq!(err.exit_code(), 1);
}

#[test]
fn test_missing_default_config_means_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_or_default(dir.path().join("Charm.toml")).unwrap();

    assert_eq!(cfg.project.build_dir, "build");
    assert_eq!(cfg.configure.generator, Generator::Meson);
    assert_eq!(cfg.build.executor, Executor::Ninja);
}

#[test]
fn test_missing_explicit_config_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_and_validate(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, CharmError::IoError(_)));
}
