// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Which user name `set` records with a credential.

use credman_config::CredmanConfig;
use credman_core::CredmanError;

#[cfg(windows)]
const USER_VARS: &[&str] = &["USERNAME"];
#[cfg(not(windows))]
const USER_VARS: &[&str] = &["USER", "LOGNAME"];

/// `--user`, else the configured default, else the OS user.
pub fn resolve_user(
    explicit: Option<&str>,
    settings: &CredmanConfig,
) -> Result<String, CredmanError> {
    resolve_user_with(explicit, settings, |key| std::env::var(key).ok())
}

/// [`resolve_user`] with an injectable environment lookup.
pub fn resolve_user_with(
    explicit: Option<&str>,
    settings: &CredmanConfig,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<String, CredmanError> {
    explicit
        .map(str::to_string)
        .or_else(|| settings.credential.user_name.clone())
        .or_else(|| USER_VARS.iter().find_map(|key| lookup(key)))
        .filter(|user| !user.trim().is_empty())
        .ok_or(CredmanError::UnknownUser)
}
