// src/tasks/configure.rs

use crate::command::{CommandSpec, EnvMap};
use crate::config::ConfigureSection;
use crate::context::ProjectContext;
use crate::exec::Invocation;
use crate::fs::FileSystem;
use crate::types::{Executor, Generator};

/// Runs the build-system generator inside the build directory.
///
/// The generator must start in the build dir: both cmake and meson resolve
/// the source argument relative to their working directory.
#[derive(Debug)]
pub struct BuildConfigurator<'a> {
    ctx: &'a ProjectContext,
    cfg: &'a ConfigureSection,
    executor: Executor,
}

impl<'a> BuildConfigurator<'a> {
    pub fn new(ctx: &'a ProjectContext, cfg: &'a ConfigureSection, executor: Executor) -> Self {
        Self { ctx, cfg, executor }
    }

    /// Compiler selection and optimization flags for the generator.
    ///
    /// `CC`/`CXX` go through the cache wrapper when one is configured.
    pub fn compiler_env(&self) -> EnvMap {
        let wrap = |compiler: &str| match &self.cfg.cache {
            Some(cache) => format!("{cache} {compiler}"),
            None => compiler.to_string(),
        };
        let flags = self.cfg.flags.join(" ");

        let mut env = EnvMap::new();
        env.insert("CC".to_string(), wrap(&self.cfg.cc));
        env.insert("CXX".to_string(), wrap(&self.cfg.cxx));
        env.insert("CFLAGS".to_string(), flags.clone());
        env.insert("CCFLAGS".to_string(), flags.clone());
        env.insert("CXXFLAGS".to_string(), flags);
        env
    }

    /// Generator command; `generator` overrides the configured one.
    ///
    /// `fs` is consulted to detect an existing meson build dir, which needs
    /// `--reconfigure` instead of a fresh setup.
    pub fn command(&self, generator: Option<Generator>, fs: &dyn FileSystem) -> CommandSpec {
        let source = self.ctx.source_dir_from_build_dir();
        let std = &self.cfg.cxx_standard;

        let spec = match generator.unwrap_or(self.cfg.generator) {
            Generator::Cmake => CommandSpec::new("cmake").args([
                "-DCMAKE_EXPORT_COMPILE_COMMANDS=ON".to_string(),
                "-DCMAKE_BUILD_TYPE=Release".to_string(),
                format!("-DCMAKE_CXX_STANDARD={std}"),
                "-DCMAKE_CXX_STANDARD_REQUIRED=ON".to_string(),
                "-DCMAKE_CXX_EXTENSIONS=OFF".to_string(),
                "-G".to_string(),
                self.executor.cmake_backend().to_string(),
                source,
            ]),
            Generator::Meson => {
                let mut spec = CommandSpec::new("meson").arg("setup");
                if fs.is_dir(&self.ctx.build_dir().join("meson-private")) {
                    spec = spec.arg("--reconfigure");
                }
                spec.args([
                    "--buildtype=release".to_string(),
                    format!("-Dcpp_std=c++{std}"),
                    "-Db_lto=true".to_string(),
                    ".".to_string(),
                    source,
                ])
            }
        };

        spec.envs(self.compiler_env())
    }

    pub fn invocation(&self, generator: Option<Generator>, fs: &dyn FileSystem) -> Invocation {
        self.ctx.at_build_dir().command(self.command(generator, fs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use std::path::Path;

    fn fixture() -> (MockFileSystem, ProjectContext) {
        let fs = MockFileSystem::new();
        fs.add_dir("/repo");
        let ctx = ProjectContext::resolve(&fs, Path::new("/repo"), "build").unwrap();
        (fs, ctx)
    }

    #[test]
    fn cmake_flags_and_cwd() {
        let (fs, ctx) = fixture();
        let cfg = ConfigureSection::default();
        let inv = BuildConfigurator::new(&ctx, &cfg, Executor::Ninja)
            .invocation(Some(Generator::Cmake), &fs);

        assert_eq!(inv.cwd, Path::new("/repo/build"));
        assert_eq!(
            inv.spec.to_shell_line(),
            "cmake '-DCMAKE_EXPORT_COMPILE_COMMANDS=ON' '-DCMAKE_BUILD_TYPE=Release' \
             '-DCMAKE_CXX_STANDARD=20' '-DCMAKE_CXX_STANDARD_REQUIRED=ON' \
             '-DCMAKE_CXX_EXTENSIONS=OFF' -G Ninja .."
        );
    }

    #[test]
    fn cmake_backend_matches_make() {
        let (fs, ctx) = fixture();
        let cfg = ConfigureSection::default();
        let spec =
            BuildConfigurator::new(&ctx, &cfg, Executor::Make).command(Some(Generator::Cmake), &fs);
        let argv = spec.argv();
        let g = argv.iter().position(|a| a == "-G").unwrap();
        assert_eq!(argv[g + 1], "Unix Makefiles");
    }

    #[test]
    fn meson_fresh_and_reconfigure() {
        let (fs, ctx) = fixture();
        let cfg = ConfigureSection::default();
        let configurator = BuildConfigurator::new(&ctx, &cfg, Executor::Ninja);

        let fresh = configurator.command(Some(Generator::Meson), &fs);
        assert_eq!(
            fresh.argv(),
            &["meson", "setup", "--buildtype=release", "-Dcpp_std=c++20", "-Db_lto=true", ".", ".."]
        );

        fs.add_dir("/repo/build/meson-private");
        let again = configurator.command(Some(Generator::Meson), &fs);
        assert_eq!(again.argv()[2], "--reconfigure");
    }

    #[test]
    fn compiler_env_uses_cache_wrapper() {
        let (_fs, ctx) = fixture();
        let cfg = ConfigureSection::default();
        let env = BuildConfigurator::new(&ctx, &cfg, Executor::Ninja).compiler_env();

        assert_eq!(env["CC"], "ccache clang");
        assert_eq!(env["CXX"], "ccache clang++");
        assert_eq!(env["CCFLAGS"], "-O3 -flto");
        assert_eq!(env["CXXFLAGS"], "-O3 -flto");
    }

    #[test]
    fn compiler_env_without_cache() {
        let (_fs, ctx) = fixture();
        let cfg = ConfigureSection {
            cache: None,
            cc: "gcc".into(),
            cxx: "g++".into(),
            ..ConfigureSection::default()
        };
        let env = BuildConfigurator::new(&ctx, &cfg, Executor::Ninja).compiler_env();

        assert_eq!(env["CC"], "gcc");
        assert_eq!(env["CXX"], "g++");
    }

    #[test]
    fn nested_build_dir_uses_absolute_source() {
        let fs = MockFileSystem::new();
        fs.add_dir("/repo");
        let ctx = ProjectContext::resolve(&fs, Path::new("/repo"), "out/release").unwrap();
        let cfg = ConfigureSection::default();
        let spec = BuildConfigurator::new(&ctx, &cfg, Executor::Ninja)
            .command(Some(Generator::Meson), &fs);
        assert_eq!(spec.argv().last().map(String::as_str), Some("/repo"));
    }
}
