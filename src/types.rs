use std::fmt;

use serde::Deserialize;

/// Build-system generator invoked by the configure step.
///
/// - `Meson` (default): `meson setup` into the build directory.
/// - `Cmake`: classic out-of-source `cmake <source>` from the build directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generator {
    Cmake,
    Meson,
}

impl Default for Generator {
    fn default() -> Self {
        Generator::Meson
    }
}

impl Generator {
    pub fn program(self) -> &'static str {
        match self {
            Generator::Cmake => "cmake",
            Generator::Meson => "meson",
        }
    }
}

impl fmt::Display for Generator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// Build executor that carries out compilation inside the build directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Executor {
    Make,
    Ninja,
}

impl Default for Executor {
    fn default() -> Self {
        Executor::Ninja
    }
}

impl Executor {
    pub fn program(self) -> &'static str {
        match self {
            Executor::Make => "make",
            Executor::Ninja => "ninja",
        }
    }

    /// Name of the matching cmake backend (`-G <name>`).
    pub fn cmake_backend(self) -> &'static str {
        match self {
            Executor::Make => "Unix Makefiles",
            Executor::Ninja => "Ninja",
        }
    }
}

impl fmt::Display for Executor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_meson_and_ninja() {
        assert_eq!(Generator::default(), Generator::Meson);
        assert_eq!(Executor::default().to_string(), "ninja");
    }

    #[test]
    fn cmake_backend_follows_executor() {
        assert_eq!(Executor::Ninja.cmake_backend(), "Ninja");
        assert_eq!(Executor::Make.cmake_backend(), "Unix Makefiles");
    }
}
