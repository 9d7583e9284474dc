// SPDX-FileCopyrightText: 2026 Credman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Settings model for the credman binary.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a mistyped key is
//! reported instead of silently ignored.

use serde::{Deserialize, Serialize};

/// Top-level credman settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredmanConfig {
    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Defaults applied to credentials written by `set`.
    #[serde(default)]
    pub credential: CredentialConfig,
}

/// Log output settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is not set (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Defaults applied to credentials written by `set`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialConfig {
    /// User name recorded with new credentials. `None` uses the OS user.
    #[serde(default)]
    pub user_name: Option<String>,
}
