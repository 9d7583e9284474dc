// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `set`, `get` and `delete`.

use std::io::Write;

use credman_core::CredmanError;
use credman_store::{CredentialApi, CredentialStore};
use secrecy::ExposeSecret;
use tracing::debug;

/// Printed to stderr by `get` when the name has no stored config.
pub const NOT_FOUND_MESSAGE: &str = "No config found for the given application name.";

/// How a command that did not fail ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// `get` found no record.
    NotFound,
}

impl Outcome {
    /// Process exit status. Failures exit with 1.
    pub fn exit_code(self) -> u8 {
        match self {
            Outcome::Done => 0,
            Outcome::NotFound => 2,
        }
    }
}

/// Normalize `input` and store it under `name`, replacing any earlier config.
///
/// Nothing is written when the input is rejected.
pub fn run_set<A: CredentialApi>(
    store: &CredentialStore<A>,
    name: &str,
    input: &str,
    user_name: &str,
) -> Result<Outcome, CredmanError> {
    let canonical = credman_config::parse(input)?;
    debug!(name, user_name, "storing normalized config");
    store.write(name, user_name, canonical.expose_secret())?;
    Ok(Outcome::Done)
}

/// Write the config stored under `name` to `out`, followed by a newline.
pub fn run_get<A: CredentialApi>(
    store: &CredentialStore<A>,
    name: &str,
    out: &mut impl Write,
) -> Result<Outcome, CredmanError> {
    match store.read(name)? {
        Some(record) => {
            writeln!(out, "{}", record.secret.expose_secret())?;
            out.flush()?;
            Ok(Outcome::Done)
        }
        None => Ok(Outcome::NotFound),
    }
}

/// Remove the config stored under `name`.
pub fn run_delete<A: CredentialApi>(
    store: &CredentialStore<A>,
    name: &str,
) -> Result<Outcome, CredmanError> {
    store.delete(name)?;
    Ok(Outcome::Done)
}
