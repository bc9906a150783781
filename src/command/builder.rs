// src/command/builder.rs

use std::borrow::Cow;
use std::fmt;

use crate::command::env::EnvMap;

/// One external command: ordered argv tokens plus an environment overlay.
///
/// The overlay only lists variables to set; everything else is inherited
/// from the orchestrator's own environment when the command runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    argv: Vec<String>,
    env: EnvMap,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            argv: vec![program.into()],
            env: EnvMap::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.argv.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.argv.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an overlay variable. A later call for the same key wins.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in vars {
            self.env.insert(k.into(), v.into());
        }
        self
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn env_overlay(&self) -> &EnvMap {
        &self.env
    }

    /// The escaped command line handed to `sh -c`.
    ///
    /// POSIX word splitting of the result yields exactly [`Self::argv`], and
    /// so does bash acting as `sh`.
    pub fn to_shell_line(&self) -> String {
        self.argv
            .iter()
            .map(|token| quote(token))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Overlay rendered as `KEY=value` assignments, escaped the same way.
    ///
    /// Prefixing these to [`Self::to_shell_line`] reproduces the invocation
    /// in an interactive shell.
    pub fn env_assignments(&self) -> String {
        self.env
            .iter()
            .map(|(k, v)| format!("{k}={}", quote(v)))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote one token for `sh -c`.
///
/// `shell_words::quote` leaves `{`, `}` and `,` bare. Bash brace-expands
/// those even in POSIX mode, so any token with a brace is single-quoted.
pub fn quote(token: &str) -> Cow<'_, str> {
    if token.contains(['{', '}']) {
        Cow::Owned(format!("'{}'", token.replace('\'', r"'\''")))
    } else {
        shell_words::quote(token)
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.env.is_empty() {
            f.write_str(&self.to_shell_line())
        } else {
            write!(f, "{} {}", self.env_assignments(), self.to_shell_line())
        }
    }
}
