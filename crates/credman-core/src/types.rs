// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record types shared by the store and the command surface.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Upper bound on the UTF-16 encoded secret, in bytes (5 * 512).
pub const MAX_SECRET_BYTES: usize = 2560;

/// Kind of vault record. Only generic credentials are supported.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum CredentialKind {
    Generic,
}

impl CredentialKind {
    /// Native type code for this kind.
    pub const fn code(self) -> u32 {
        match self {
            CredentialKind::Generic => 1,
        }
    }

    /// Map a native type code back to a supported kind.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(CredentialKind::Generic),
            _ => None,
        }
    }
}

/// A credential as read back from the vault, with every field copied out of
/// vault-owned memory.
///
/// `Debug` output redacts the secret.
#[derive(Debug)]
pub struct CredentialRecord {
    pub kind: CredentialKind,
    /// Lookup key; the application name.
    pub target_name: String,
    pub user_name: String,
    /// Canonical Base64 config text.
    pub secret: SecretString,
}
