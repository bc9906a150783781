// src/command/mod.rs

//! Command construction.
//!
//! - [`builder`] holds [`CommandSpec`]: an argv plus an environment overlay,
//!   rendered into the single escaped line that is both logged and executed.
//! - [`env`] implements the "base environment ⊕ overlay" merge as pure
//!   functions.

pub mod builder;
pub mod env;

pub use builder::{CommandSpec, quote};
pub use env::{EnvMap, overlay};
