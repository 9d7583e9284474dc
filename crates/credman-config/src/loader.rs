// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings loader using Figment for layered merging.
//!
//! Merge order (later overrides earlier):
//! 1. Compiled defaults
//! 2. `<config_dir>/credman/credman.toml` (per-user)
//! 3. `./credman.toml` (working directory)
//! 4. `CREDMAN_*` environment variables

#![allow(clippy::result_large_err)] // figment::Error is external

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::CredmanConfig;

/// File name looked up in each hierarchy directory.
pub const CONFIG_FILE_NAME: &str = "credman.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "CREDMAN_";

/// Load settings from the standard hierarchy with env var overrides.
pub fn load_config() -> Result<CredmanConfig, figment::Error> {
    build_figment().extract()
}

/// Load settings from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<CredmanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CredmanConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load settings from one explicit file with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<CredmanConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(CredmanConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// The Figment behind [`load_config`], before extraction.
pub fn build_figment() -> Figment {
    search_paths()
        .into_iter()
        .fold(
            Figment::new().merge(Serialized::defaults(CredmanConfig::default())),
            |figment, path| figment.merge(Toml::file(path)),
        )
        .merge(env_provider())
}

/// Hierarchy files in merge order. Missing files are skipped at load time.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("credman").join(CONFIG_FILE_NAME));
    }
    let local = std::env::current_dir()
        .map(|d| d.join(CONFIG_FILE_NAME))
        .unwrap_or_else(|_| PathBuf::from(CONFIG_FILE_NAME));
    paths.push(local);
    paths
}

/// Environment provider with explicit section mapping.
///
/// `Env::split("_")` would turn `CREDMAN_CREDENTIAL_USER_NAME` into
/// `credential.user.name`; only the first separator marks the section.
fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX).map(|key| env_key(key.as_str()).into())
}

/// Map a prefix-stripped variable name such as `CREDENTIAL_USER_NAME` to its
/// settings key. Figment hands the name over in its original case.
fn env_key(name: &str) -> String {
    name.to_ascii_lowercase()
        .replacen("logging_", "logging.", 1)
        .replacen("credential_", "credential.", 1)
}
