// src/command/env.rs

use std::collections::BTreeMap;

/// Environment variable name → value.
pub type EnvMap = BTreeMap<String, String>;

/// Merge `top` over `base`: keys in `top` win, everything else passes through.
pub fn overlay(base: &EnvMap, top: &EnvMap) -> EnvMap {
    let mut merged = base.clone();
    merged.extend(top.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

/// Parse a `KEY=VALUE` assignment (value may be empty or contain `=`).
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{s}'"))?;
    if !is_valid_name(key) {
        return Err(format!("invalid environment variable name '{key}'"));
    }
    Ok((key.to_string(), value.to_string()))
}

fn is_valid_name(key: &str) -> bool {
    let mut chars = key.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}
